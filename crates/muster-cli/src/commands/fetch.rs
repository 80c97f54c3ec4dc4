//! Fetch command implementation.

use crate::acquire::{download_all, HttpFetcher};
use crate::cli::FetchArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the fetch command.
pub fn execute_fetch(args: FetchArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| config.input_dir.clone());
    let fetcher = HttpFetcher::new()?;
    let plan = download_all(&fetcher, &dir)?;

    println!(
        "{}",
        formatter.success(&format!(
            "Downloaded {} documents to {}",
            plan.downloads.len(),
            dir.display()
        ))
    );
    println!(
        "{}",
        formatter.info("Produce a JSON page dump beside each PDF, then run 'muster extract'")
    );
    Ok(())
}
