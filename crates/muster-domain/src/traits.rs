//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction engine and
//! infrastructure. PDF decoding and network access live in other crates.

use crate::geometry::Page;
use chrono::NaiveDate;

/// A decoded document exposing its pages one at a time
///
/// Any backend that can report words with rectangles, painted lines, tables
/// with bounding boxes, image boxes and plain text is substitutable.
pub trait PageSource {
    /// Error type for decoding operations
    type Error;

    /// Number of pages in the document
    fn page_count(&self) -> usize;

    /// Decode the page at `index` (zero-based)
    fn page(&self, index: usize) -> Result<Page, Self::Error>;

    /// Creation date recorded in the document metadata, if any
    fn creation_date(&self) -> Option<NaiveDate>;
}

/// A document offered by a remote catalogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDocument {
    /// Human-readable title
    pub title: String,

    /// Remote file reference, relative to the asset base
    pub file: String,
}

/// Trait for enumerating and downloading source documents
///
/// Used by acquisition only; the extraction engine never calls it.
pub trait DocumentFetcher {
    /// Error type for fetch operations
    type Error;

    /// List every downloadable document
    fn list(&self) -> Result<Vec<RemoteDocument>, Self::Error>;

    /// Download the bytes of one document
    fn fetch(&self, document: &RemoteDocument) -> Result<Vec<u8>, Self::Error>;
}
