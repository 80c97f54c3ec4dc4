//! Summary command implementation.

use crate::cli::SummaryArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::metadata::BattleProfileOutput;
use crate::output::Formatter;
use std::fs;
use std::path::Path;

/// Execute the summary command.
pub fn execute_summary(args: SummaryArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let path = args
        .file
        .unwrap_or_else(|| config.output_dir.join("battleprofile.json"));
    let output = read_battle_profiles(&path)?;
    println!("{}", formatter.format_factions(&output.data));
    Ok(())
}

/// Read a produced `battleprofile.json`.
pub fn read_battle_profiles(path: &Path) -> Result<BattleProfileOutput> {
    let contents = fs::read_to_string(path)?;
    let output: BattleProfileOutput = serde_json::from_str(&contents)?;
    if output.kind != "battleprofile" {
        return Err(CliError::InvalidInput(format!(
            "{} is a '{}' document, expected 'battleprofile'",
            path.display(),
            output.kind
        )));
    }
    Ok(output)
}
