//! Core Extractor implementation

use std::fmt::Display;

use muster_domain::{BattleProfileData, FaqSection, PageSource};
use tracing::{debug, info};

use crate::config::ExtractorConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::ExtractorError;
use crate::faq::FaqSectionBuilder;
use crate::profiles::BattleProfileBuilder;
use crate::segmenter::PageSegmenter;
use crate::types::{ExtractionOutcome, PublicationDate};

/// The Extractor turns decoded documents into the FAQ and battle-profile trees
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractorConfig,
    segmenter: PageSegmenter,
}

impl Extractor {
    /// Create an Extractor, rejecting an invalid configuration
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self {
            segmenter: PageSegmenter::new(config.clone()),
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract the FAQ sections of a rules-update document.
    ///
    /// Fails only when a page breaks the question/answer ordering or the
    /// source cannot decode a page.
    pub fn extract_faq<S>(&self, source: &S) -> Result<Vec<FaqSection>, ExtractorError>
    where
        S: PageSource,
        S::Error: Display,
    {
        info!("Extracting FAQ from {} pages", source.page_count());
        let mut builder = FaqSectionBuilder::new(self.config.clone());
        for index in 0..source.page_count() {
            let page = source.page(index).map_err(source_error)?;
            builder.process_page(&self.segmenter.faq_layout(&page))?;
        }
        Ok(builder.finish())
    }

    /// Start a battle-profile run
    pub fn battle_profiles(&self) -> ProfileRun<'_> {
        ProfileRun {
            segmenter: &self.segmenter,
            builder: BattleProfileBuilder::new(self.config.clone()),
            baseline: None,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Extract battle profiles from the shared document and every faction
    /// document, in order
    pub fn extract_battle_profiles<S, I>(
        &self,
        shared_name: &str,
        shared: &S,
        factions: I,
    ) -> Result<ExtractionOutcome<BattleProfileData>, ExtractorError>
    where
        S: PageSource,
        S::Error: Display,
        I: IntoIterator<Item = (String, S)>,
    {
        let mut run = self.battle_profiles();
        run.ingest_shared(shared_name, shared)?;
        for (name, source) in factions {
            run.ingest_faction(&name, &source)?;
        }
        Ok(run.finish())
    }
}

/// One battle-profile run across several documents.
///
/// The shared document sets the publication baseline; faction documents
/// published earlier than it are skipped. [`ProfileRun::finish`] performs
/// the one-time resolution.
#[derive(Debug)]
pub struct ProfileRun<'a> {
    segmenter: &'a PageSegmenter,
    builder: BattleProfileBuilder,
    baseline: Option<PublicationDate>,
    diagnostics: Diagnostics,
}

impl ProfileRun<'_> {
    /// Ingest the shared battle-profiles document
    pub fn ingest_shared<S>(&mut self, name: &str, source: &S) -> Result<(), ExtractorError>
    where
        S: PageSource,
        S::Error: Display,
    {
        self.baseline = publication_date(source)?;
        match self.baseline {
            Some(date) => info!("{} published {}", name, date),
            None => info!("{}: publication date unknown", name),
        }
        self.ingest(source)
    }

    /// Ingest one faction document; returns `false` when it was skipped as
    /// older than the shared document
    pub fn ingest_faction<S>(&mut self, name: &str, source: &S) -> Result<bool, ExtractorError>
    where
        S: PageSource,
        S::Error: Display,
    {
        let published = publication_date(source)?;
        if let (Some(published), Some(baseline)) = (published, self.baseline) {
            if published < baseline {
                self.diagnostics.record(
                    DiagnosticKind::SkippedDocument,
                    name,
                    format!("published {} before shared document {}", published, baseline),
                );
                return Ok(false);
            }
        }
        info!("Ingesting faction document {}", name);
        self.ingest(source)?;
        Ok(true)
    }

    /// Resolve everything ingested
    pub fn finish(mut self) -> ExtractionOutcome<BattleProfileData> {
        let data = self.builder.finalize(&mut self.diagnostics);
        info!(
            "Extracted {} factions, {} regiments of renown, {} universal manifestations",
            data.factions.len(),
            data.regiments_of_renown.len(),
            data.universal_manifestations.len()
        );
        ExtractionOutcome {
            data,
            diagnostics: self.diagnostics,
        }
    }

    fn ingest<S>(&mut self, source: &S) -> Result<(), ExtractorError>
    where
        S: PageSource,
        S::Error: Display,
    {
        for index in 0..source.page_count() {
            let page = source.page(index).map_err(source_error)?;
            let layout = self.segmenter.table_layout(&page);
            debug!("Page {}: {} tables", page.number, layout.tables.len());
            self.builder
                .process_page(page.number, &layout, &mut self.diagnostics);
        }
        Ok(())
    }
}

/// Month/year from the first page's text, else from the creation date
fn publication_date<S>(source: &S) -> Result<Option<PublicationDate>, ExtractorError>
where
    S: PageSource,
    S::Error: Display,
{
    if source.page_count() > 0 {
        let first = source.page(0).map_err(source_error)?;
        if let Some(date) = PublicationDate::from_text(&first.text) {
            return Ok(Some(date));
        }
    }
    Ok(source.creation_date().map(PublicationDate::from_date))
}

fn source_error<E: Display>(e: E) -> ExtractorError {
    ExtractorError::Source(e.to_string())
}
