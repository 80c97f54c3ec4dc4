//! Error types for the CLI application.

use muster_extractor::ExtractorError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Extraction failed
    #[error("Extraction error: {0}")]
    Extractor(#[from] ExtractorError),

    /// Catalogue or download request failed
    #[error("HTTP error: {0}")]
    Http(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Required source documents were not offered by the catalogue
    #[error("Required downloads missing: {}", .0.join(", "))]
    MissingDocuments(Vec<String>),
}

impl From<reqwest::Error> for CliError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) if status.is_server_error() => {
                CliError::Http(format!("Server error (HTTP {})", status))
            }
            Some(status) => CliError::Http(format!("HTTP {}: {}", status, e)),
            None => CliError::Http(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_documents_lists_every_item() {
        let err = CliError::MissingDocuments(vec![
            "rules_update.pdf not found".to_string(),
            "No faction battle profiles PDFs found".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Required downloads missing: rules_update.pdf not found, No faction battle profiles PDFs found"
        );
    }
}
