//! Configuration for the Extractor
//!
//! Geometric tolerances are in PDF points.

use serde::{Deserialize, Serialize};

/// Configuration for page segmentation and tree building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Margin added around table bounding boxes when deciding whether a
    /// word is inside a table
    pub table_margin: f64,

    /// Maximum endpoint height difference for a line to count as a
    /// strike-through
    pub strike_tolerance: f64,

    /// Buffer added around a vertical column divider before cropping
    pub boundary_buffer: f64,

    /// Maximum horizontal span of a column divider line
    pub divider_max_width: f64,

    /// Minimum vertical span of a column divider line
    pub divider_min_height: f64,

    /// Line grouping tolerance for text outside the columns
    pub outside_line_tolerance: f64,

    /// Line grouping tolerance for column text
    pub column_line_tolerance: f64,

    /// Index of the section title among the outside-text lines of a FAQ page
    pub section_title_line: usize,

    /// Index of the faction/page title among the outside-text lines of a
    /// battle-profile page
    pub profile_title_line: usize,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let tolerances = [
            ("table_margin", self.table_margin),
            ("strike_tolerance", self.strike_tolerance),
            ("boundary_buffer", self.boundary_buffer),
            ("divider_max_width", self.divider_max_width),
            ("outside_line_tolerance", self.outside_line_tolerance),
            ("column_line_tolerance", self.column_line_tolerance),
        ];
        for (name, value) in tolerances {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number", name));
            }
        }
        if self.divider_min_height <= self.divider_max_width {
            return Err("divider_min_height must exceed divider_max_width".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    /// Tolerances matching the published rules-update and battle-profile
    /// layouts
    fn default() -> Self {
        Self {
            table_margin: 2.0,
            strike_tolerance: 1.0,
            boundary_buffer: 10.0,
            divider_max_width: 5.0,
            divider_min_height: 50.0,
            outside_line_tolerance: 2.0,
            column_line_tolerance: 5.0,
            section_title_line: 3,
            profile_title_line: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ExtractorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_negative_margin_rejected() {
        let config = ExtractorConfig {
            table_margin: -1.0,
            ..ExtractorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_divider_bounds_rejected() {
        let config = ExtractorConfig {
            divider_min_height: 4.0,
            ..ExtractorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ExtractorConfig::from_toml("column_line_tolerance = 4.0").unwrap();
        assert_eq!(config.column_line_tolerance, 4.0);
        assert_eq!(config.table_margin, 2.0);
        assert_eq!(config.section_title_line, 3);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
