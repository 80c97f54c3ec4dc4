//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Muster - Extract rules FAQs and battle profiles from published documents.
#[derive(Debug, Parser)]
#[command(name = "muster")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "MUSTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract FAQ and battle profiles from page dumps
    Extract(ExtractArgs),

    /// Download the source documents from the catalogue
    Fetch(FetchArgs),

    /// Summarise a produced battleprofile.json
    Summary(SummaryArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Directory containing the documents and their page dumps
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory to write faq.json and battleprofile.json
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory of overlay documents
    #[arg(long)]
    pub overlays: Option<PathBuf>,

    /// Skip FAQ extraction
    #[arg(long)]
    pub no_faq: bool,

    /// Skip battle-profile extraction
    #[arg(long)]
    pub no_profiles: bool,
}

/// Arguments for the fetch command.
#[derive(Debug, Parser)]
pub struct FetchArgs {
    /// Download directory (recreated on every fetch)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,
}

/// Arguments for the summary command.
#[derive(Debug, Parser)]
pub struct SummaryArgs {
    /// battleprofile.json to read (defaults to the configured output directory)
    pub file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_command() {
        let cli = Cli::parse_from([
            "muster",
            "extract",
            "--input",
            "pdfs",
            "--no-faq",
        ]);
        match cli.command {
            Command::Extract(args) => {
                assert_eq!(args.input, Some(PathBuf::from("pdfs")));
                assert!(args.output.is_none());
                assert!(args.no_faq);
                assert!(!args.no_profiles);
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["muster", "fetch", "--dir", "dl", "--verbose", "--no-color"]);
        assert!(cli.verbose);
        assert!(cli.no_color);
        match cli.command {
            Command::Fetch(args) => assert_eq!(args.dir, Some(PathBuf::from("dl"))),
            _ => panic!("Expected Fetch command"),
        }
    }

    #[test]
    fn test_summary_file_is_optional() {
        let cli = Cli::parse_from(["muster", "summary"]);
        assert!(matches!(cli.command, Command::Summary(SummaryArgs { file: None })));

        let cli = Cli::parse_from(["muster", "--config", "m.toml", "summary", "out/bp.json"]);
        assert_eq!(cli.config, Some(PathBuf::from("m.toml")));
        match cli.command {
            Command::Summary(args) => assert_eq!(args.file, Some(PathBuf::from("out/bp.json"))),
            _ => panic!("Expected Summary command"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["muster"]).is_err());
    }
}
