//! Muster Extractor
//!
//! Turns decoded rules-update and battle-profile documents into structured
//! FAQ and battle-profile trees.
//!
//! # Architecture
//!
//! ```text
//! PageSource → PageSegmenter → FaqSectionBuilder      → Vec<FaqSection>
//!                            → TableClassifier
//!                              → BattleProfileBuilder → finalize → BattleProfileData
//!                                (NoteInterpreter, RegimentOptionParser)
//! BattleProfileData + overlays → merge_overlays
//! ```
//!
//! Ingestion is strictly sequential. Regiment options are resolved once,
//! after every document of a run has been ingested, against corpora built
//! from everything seen.
//!
//! # Example Usage
//!
//! ```no_run
//! use muster_domain::PageSource;
//! use muster_extractor::{Extractor, ExtractorConfig, ExtractorError};
//!
//! fn run<S>(rules_update: &S, shared: &S, factions: Vec<(String, S)>) -> Result<(), ExtractorError>
//! where
//!     S: PageSource,
//!     S::Error: std::fmt::Display,
//! {
//!     let extractor = Extractor::new(ExtractorConfig::default())?;
//!
//!     let sections = extractor.extract_faq(rules_update)?;
//!     println!("{} FAQ sections", sections.len());
//!
//!     let outcome = extractor.extract_battle_profiles("battle_profiles", shared, factions)?;
//!     println!("{} factions", outcome.data.factions.len());
//!     println!("{}", outcome.diagnostics.summary());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod classifier;
mod config;
mod diagnostics;
mod error;
mod extractor;
mod faq;
mod notes;
mod overlay;
mod profiles;
mod regiment_option;
mod renown;
mod segmenter;
mod types;


pub use classifier::{classify, Column, ColumnMap, TableKind};
pub use config::ExtractorConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::ExtractorError;
pub use extractor::{Extractor, ProfileRun};
pub use faq::{is_upper_line, FaqSectionBuilder};
pub use notes::{apply_notes, interpret, NoteEffect};
pub use overlay::merge_overlays;
pub use profiles::BattleProfileBuilder;
pub use regiment_option::{parse as parse_regiment_option, resolve_options, Corpora, ParsedOption};
pub use renown::{parse_allowed_armies, parse_points, parse_unit_summary};
pub use segmenter::{contains_faq, group_lines, FaqLayout, PageSegmenter, TableLayout};
pub use types::{ExtractionOutcome, PublicationDate};
