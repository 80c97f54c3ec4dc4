//! Output formatting for the CLI.

use colored::*;
use muster_domain::BattleProfileData;
use muster_extractor::Diagnostics;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format the factions of a battle-profile tree as a table.
    pub fn format_factions(&self, data: &BattleProfileData) -> String {
        if data.factions.is_empty() {
            return self.colorize("No factions found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Faction", "Units", "Heroes", "Legends", "Other"]);

        for faction in &data.factions {
            let heroes = faction.battle_profiles.iter().filter(|p| p.hero).count();
            let legends = faction.battle_profiles.iter().filter(|p| p.legends).count();
            builder.push_record([
                faction.name.clone(),
                faction.battle_profiles.len().to_string(),
                heroes.to_string(),
                legends.to_string(),
                faction.other.len().to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        format!(
            "{}\n{}",
            table,
            self.info(&format!(
                "{} regiments of renown, {} universal manifestations",
                data.regiments_of_renown.len(),
                data.universal_manifestations.len()
            ))
        )
    }

    /// Format the diagnostics of a run.
    pub fn format_diagnostics(&self, diagnostics: &Diagnostics) -> String {
        let summary = diagnostics.summary();
        if diagnostics.is_empty() {
            summary
        } else {
            self.colorize(&summary, "yellow")
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muster_domain::{Faction, OtherProfile, UnitProfile};

    fn data() -> BattleProfileData {
        BattleProfileData {
            factions: vec![Faction {
                name: "SERAPHON".to_string(),
                battle_profiles: vec![
                    UnitProfile {
                        hero: true,
                        ..UnitProfile::new("Saurus Oldblood")
                    },
                    UnitProfile::new("Saurus Warriors"),
                ],
                other: vec![OtherProfile {
                    name: "Lore of Celestial Manipulation".to_string(),
                    kind: "Spell Lore".to_string(),
                    points: 0,
                    notes: String::new(),
                }],
            }],
            ..BattleProfileData::default()
        }
    }

    #[test]
    fn test_faction_table() {
        let formatter = Formatter::new(false);
        let output = formatter.format_factions(&data());
        assert!(output.contains("Faction"));
        assert!(output.contains("SERAPHON"));
        assert!(output.contains("│ 2 "));
        assert!(output.contains("0 regiments of renown"));
    }

    #[test]
    fn test_empty_factions() {
        let formatter = Formatter::new(false);
        let output = formatter.format_factions(&BattleProfileData::default());
        assert!(output.contains("No factions found"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("test"), "⚠ test");
    }

    #[test]
    fn test_clean_diagnostics_uncolored() {
        let formatter = Formatter::new(true);
        let output = formatter.format_diagnostics(&Diagnostics::new());
        assert!(output.contains("No anomalies recorded"));
    }
}
