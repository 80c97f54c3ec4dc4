//! JSON page-dump backend.
//!
//! A page dump is produced by an external PDF decoder:
//!
//! ```text
//! { "creation_date": "D:20250612093000Z",
//!   "pages": [ { "words": [{text, x0, top, x1, bottom}], "lines": [...],
//!                "tables": [{bbox, rows: [[{text?, bbox?}]]}],
//!                "images": [...], "text": "..." } ] }
//! ```
//!
//! Pages stay as raw JSON until requested, and are decoded one at a time.

use crate::error::Result;
use chrono::NaiveDate;
use muster_domain::{Page, PageSource};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct PageDump {
    #[serde(default)]
    creation_date: Option<String>,
    #[serde(default)]
    pages: Vec<Value>,
}

/// A decoded document read from a JSON page dump.
#[derive(Debug, Clone)]
pub struct JsonDocument {
    pages: Vec<Value>,
    creation_date: Option<NaiveDate>,
}

impl JsonDocument {
    /// Read a page dump from disk.
    pub fn open(path: &Path) -> Result<Self> {
        debug!("Reading page dump {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a page dump from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let dump: PageDump = serde_json::from_str(json)?;
        Ok(Self {
            creation_date: dump.creation_date.as_deref().and_then(parse_pdf_date),
            pages: dump.pages,
        })
    }
}

impl PageSource for JsonDocument {
    type Error = serde_json::Error;

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> std::result::Result<Page, Self::Error> {
        let raw = self.pages.get(index).cloned().unwrap_or(Value::Null);
        let mut page: Page = serde_json::from_value(raw)?;
        page.number = index;
        Ok(page)
    }

    fn creation_date(&self) -> Option<NaiveDate> {
        self.creation_date
    }
}

/// Parse a PDF metadata date (`D:YYYYMMDD...`) or an ISO date (`YYYY-MM-DD`).
pub fn parse_pdf_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let raw = raw.strip_prefix("D:").unwrap_or(raw);
    if let Some(digits) = raw.get(..8).filter(|d| d.bytes().all(|b| b.is_ascii_digit())) {
        return NaiveDate::parse_from_str(digits, "%Y%m%d").ok();
    }
    raw.get(..10)
        .and_then(|iso| NaiveDate::parse_from_str(iso, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"{
        "creation_date": "D:20250612093000+01'00'",
        "pages": [
            {
                "words": [{"text": "SERAPHON", "x0": 20.0, "top": 55.0, "x1": 80.0, "bottom": 65.0}],
                "lines": [{"x0": 300.0, "top": 100.0, "x1": 300.0, "bottom": 700.0}],
                "tables": [{
                    "bbox": {"x0": 10.0, "top": 200.0, "x1": 590.0, "bottom": 780.0},
                    "rows": [[{"text": "UNITS"}, {}], [{"text": "Saurus Warriors", "bbox": {"x0": 10.0, "top": 220.0, "x1": 100.0, "bottom": 240.0}}, {"text": null}]]
                }],
                "images": [{"x0": 0.0, "top": 0.0, "x1": 600.0, "bottom": 90.0}],
                "text": "BATTLE PROFILES\nJune 2025"
            },
            {}
        ]
    }"#;

    #[test]
    fn test_pages_decoded_by_index() {
        let document = JsonDocument::from_json(DUMP).unwrap();
        assert_eq!(document.page_count(), 2);

        let first = document.page(0).unwrap();
        assert_eq!(first.number, 0);
        assert_eq!(first.words[0].text, "SERAPHON");
        assert_eq!(first.lines.len(), 1);
        assert_eq!(first.tables[0].rows[0][1].text, None);
        assert!(first.tables[0].rows[1][0].bbox.is_some());
        assert_eq!(first.images.len(), 1);

        let second = document.page(1).unwrap();
        assert_eq!(second.number, 1);
        assert!(second.words.is_empty());
    }

    #[test]
    fn test_out_of_range_page_is_an_error() {
        let document = JsonDocument::from_json(DUMP).unwrap();
        assert!(document.page(5).is_err());
    }

    #[test]
    fn test_creation_date_from_metadata() {
        let document = JsonDocument::from_json(DUMP).unwrap();
        assert_eq!(document.creation_date(), NaiveDate::from_ymd_opt(2025, 6, 12));

        let undated = JsonDocument::from_json(r#"{"pages": []}"#).unwrap();
        assert_eq!(undated.creation_date(), None);
    }

    #[test]
    fn test_parse_pdf_date_forms() {
        assert_eq!(parse_pdf_date("D:20241102"), NaiveDate::from_ymd_opt(2024, 11, 2));
        assert_eq!(parse_pdf_date("20241102120000Z"), NaiveDate::from_ymd_opt(2024, 11, 2));
        assert_eq!(parse_pdf_date("2024-11-02T10:00:00"), NaiveDate::from_ymd_opt(2024, 11, 2));
        assert_eq!(parse_pdf_date("D:2024"), None);
        assert_eq!(parse_pdf_date("D:20241399"), None);
        assert_eq!(parse_pdf_date(""), None);
    }
}
