//! Types shared by the extraction pipeline

use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::diagnostics::Diagnostics;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

static MONTH_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b({})\s+(\d{{4}})\b", MONTHS.join("|"))).unwrap()
});

/// Month and year a document was published
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublicationDate {
    /// Calendar year
    pub year: i32,
    /// Month, 1-12
    pub month: u32,
}

impl PublicationDate {
    /// First `<MONTH NAME> <YEAR>` in `text`
    pub fn from_text(text: &str) -> Option<Self> {
        let caps = MONTH_YEAR_RE.captures(text)?;
        let name = caps[1].to_lowercase();
        let month = MONTHS.iter().position(|m| *m == name)? as u32 + 1;
        let year = caps[2].parse().ok()?;
        Some(Self { year, month })
    }

    /// Month and year of a calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for PublicationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Extracted data together with the anomalies recorded while producing it
#[derive(Debug, Clone)]
pub struct ExtractionOutcome<T> {
    /// Extracted data
    pub data: T,
    /// Local anomalies; none of them aborted the run
    pub diagnostics: Diagnostics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_year_from_text() {
        assert_eq!(
            PublicationDate::from_text("BATTLE PROFILES\nJune 2025\nPage 1"),
            Some(PublicationDate { year: 2025, month: 6 })
        );
        assert_eq!(
            PublicationDate::from_text("UPDATED DECEMBER 2024"),
            Some(PublicationDate { year: 2024, month: 12 })
        );
        assert_eq!(PublicationDate::from_text("Mayhem 2025"), None);
        assert_eq!(PublicationDate::from_text("no date here"), None);
    }

    #[test]
    fn test_ordering_and_display() {
        let june = PublicationDate::from_date(NaiveDate::from_ymd_opt(2025, 6, 20).unwrap());
        let jan = PublicationDate { year: 2026, month: 1 };
        assert!(june < jan);
        assert_eq!(june.to_string(), "2025-06");
    }
}
