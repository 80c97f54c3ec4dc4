//! Diagnostics collected during extraction
//!
//! Every local anomaly is logged at `warn` and kept here so callers can
//! report or assert on what was dropped.

use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// Category of a recorded anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    /// A table header matched no known table kind
    UnknownTable,
    /// A classified table lacked a column its kind normally carries
    MissingColumn,
    /// A note fragment matched no interpretation rule
    UnhandledNote,
    /// Regiment option text left unconsumed after resolution
    OptionResidue,
    /// A regiment option failed validation and was dropped
    InvalidOption,
    /// A regiment of renown with zero or negative points was dropped
    NonPositiveRenown,
    /// A unit profile with an empty or zero unit size was dropped
    EmptyUnitSize,
    /// A page had no title line at the expected position
    MissingTitle,
    /// A whole document was skipped
    SkippedDocument,
}

impl DiagnosticKind {
    /// Stable snake_case label
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::UnknownTable => "unknown_table",
            DiagnosticKind::MissingColumn => "missing_column",
            DiagnosticKind::UnhandledNote => "unhandled_note",
            DiagnosticKind::OptionResidue => "option_residue",
            DiagnosticKind::InvalidOption => "invalid_option",
            DiagnosticKind::NonPositiveRenown => "non_positive_renown",
            DiagnosticKind::EmptyUnitSize => "empty_unit_size",
            DiagnosticKind::MissingTitle => "missing_title",
            DiagnosticKind::SkippedDocument => "skipped_document",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded anomaly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Category
    pub kind: DiagnosticKind,
    /// What the anomaly is about (unit name, table header, document, ...)
    pub subject: String,
    /// Human-readable description
    pub message: String,
}

/// Ordered collection of diagnostics for one run
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an anomaly and log it
    pub fn record(
        &mut self,
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        let subject = subject.into();
        let message = message.into();
        warn!("[{}] {}: {}", kind, subject, message);
        self.entries.push(Diagnostic {
            kind,
            subject,
            message,
        });
    }

    /// All entries in recording order
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Entries of one kind
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    /// Number of entries of one kind
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Generate a summary report grouped by kind
    pub fn summary(&self) -> String {
        let mut counts: BTreeMap<DiagnosticKind, usize> = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.kind).or_insert(0) += 1;
        }

        let mut lines = vec![
            "Extraction Diagnostics".to_string(),
            "======================".to_string(),
        ];
        if counts.is_empty() {
            lines.push("No anomalies recorded".to_string());
        } else {
            for (kind, count) in &counts {
                lines.push(format!("  {}: {}", kind, count));
            }
            lines.push(format!("  Total: {}", self.len()));
        }
        lines.join("\n")
    }
}
