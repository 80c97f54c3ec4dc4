//! Error types for the Extractor

use thiserror::Error;

/// Errors that abort an extraction run
///
/// Local anomalies (unknown tables, unhandled notes, unresolved option
/// text, ...) are never errors; they are recorded in
/// [`Diagnostics`](crate::Diagnostics) and the affected data is dropped.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The FAQ state machine received an event it cannot accept
    #[error("Illegal FAQ transition: {event} while {state} (line: {line:?})")]
    IllegalTransition {
        /// State the builder was in
        state: &'static str,
        /// Event that was rejected
        event: &'static str,
        /// Source line that produced the event
        line: String,
    },

    /// The page source failed to decode a page or document
    #[error("Page source error: {0}")]
    Source(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
