//! Output documents and their provenance metadata.

use crate::error::Result;
use chrono::{DateTime, Local, NaiveDate};
use muster_domain::{BattleProfileData, FaqSection};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Provenance of an extracted source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Display title (the source file name)
    pub title: String,

    /// Source file name
    pub filename: String,

    /// SHA-256 of the source bytes, lowercase hex
    pub hash: String,

    /// Creation date from the document metadata, else the file modification date
    #[serde(rename = "publishedDate")]
    pub published_date: String,

    /// Date of the extraction run
    #[serde(rename = "extractedDate")]
    pub extracted_date: String,
}

impl DocumentMetadata {
    /// Describe the file at `path`.
    pub fn for_file(path: &Path, creation_date: Option<NaiveDate>, today: NaiveDate) -> Result<Self> {
        let bytes = fs::read(path)?;
        let published = match creation_date {
            Some(date) => date,
            None => {
                let modified: DateTime<Local> = fs::metadata(path)?.modified()?.into();
                modified.date_naive()
            }
        };
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            title: filename.clone(),
            filename,
            hash: sha256_hex(&bytes),
            published_date: published.format(DATE_FORMAT).to_string(),
            extracted_date: today.format(DATE_FORMAT).to_string(),
        })
    }
}

/// Lowercase hex SHA-256 digest.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Contents of `faq.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqOutput {
    /// Source provenance
    #[serde(flatten)]
    pub metadata: DocumentMetadata,

    /// Always `"faq"`
    #[serde(rename = "type")]
    pub kind: String,

    /// Extracted sections
    pub data: Vec<FaqSection>,
}

impl FaqOutput {
    /// Wrap extracted sections
    pub fn new(metadata: DocumentMetadata, data: Vec<FaqSection>) -> Self {
        Self {
            metadata,
            kind: "faq".to_string(),
            data,
        }
    }
}

/// Contents of `battleprofile.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleProfileOutput {
    /// Always `"battleprofile"`
    #[serde(rename = "type")]
    pub kind: String,

    /// Extracted and overlaid battle profiles
    pub data: BattleProfileData,
}

impl BattleProfileOutput {
    /// Wrap the battle-profile tree
    pub fn new(data: BattleProfileData) -> Self {
        Self {
            kind: "battleprofile".to_string(),
            data,
        }
    }
}
