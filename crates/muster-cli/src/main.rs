//! Muster CLI - Extract rules FAQs and battle profiles from published documents.

use anyhow::Context;
use clap::Parser;
use muster_cli::commands;
use muster_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load config
    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::load()?,
    };

    // Determine color setting
    let color_enabled = !cli.no_color && config.color;
    let formatter = Formatter::new(color_enabled);

    match cli.command {
        Command::Extract(args) => commands::execute_extract(args, &config, &formatter)?,
        Command::Fetch(args) => commands::execute_fetch(args, &config, &formatter)?,
        Command::Summary(args) => commands::execute_summary(args, &config, &formatter)?,
    }

    Ok(())
}
