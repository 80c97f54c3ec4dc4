//! Muster Domain Layer
//!
//! This crate contains the data model shared by every other Muster crate:
//! the geometric page primitives handed over by a document backend, the FAQ
//! tree, and the battle-profile records produced by the extractor.
//!
//! ## Key Concepts
//!
//! - **Page**: words, geometric lines, detected tables and image boxes of one
//!   decoded page
//! - **FaqSection**: section → rule → question/answer tree
//! - **Faction**: an army grouping owning unit and other battle profiles
//! - **RegimentOption**: a resolved composition rule (quantity + references)
//! - **Overlay**: a hand-authored patch applied over extracted factions
//!
//! ## Architecture
//!
//! - Pure data and text helpers only
//! - PDF decoding and network access live behind the traits in [`traits`]
//! - Everything here is serialisable so outputs round-trip through JSON

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod faq;
pub mod geometry;
pub mod profile;
pub mod text;
pub mod traits;

// Re-exports for convenience
pub use faq::{FaqSection, Question, Rule};
pub use geometry::{DetectedTable, GeomLine, Page, Rect, TableCell, Word};
pub use profile::{
    BattleProfileData, Faction, OtherProfile, Overlay, OverlayFaction, RegimentOfRenown,
    RegimentOption, UniversalManifestation, UnitProfile,
};
pub use text::{collapse_whitespace, name_key, normalize_text};
pub use traits::{DocumentFetcher, PageSource, RemoteDocument};

/// A table as an ordered grid of cell strings; row 0 is the header.
pub type Table = Vec<Vec<String>>;
