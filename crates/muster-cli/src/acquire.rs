//! Source document acquisition.
//!
//! The catalogue lists every downloadable document; [`plan_downloads`]
//! picks the rules update, the shared battle profiles and every faction
//! battle-profile document and assigns their local file names.

use crate::error::{CliError, Result};
use muster_domain::{DocumentFetcher, RemoteDocument};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Downloads search endpoint
pub const CATALOGUE_URL: &str = "https://www.warhammer-community.com/api/search/downloads/";

/// Base URL the catalogue's file references are relative to
pub const ASSET_BASE_URL: &str = "https://assets.warhammer-community.com/";

/// Local name of the rules-update document
pub const RULES_UPDATE_FILE: &str = "rules_update.pdf";

/// Local name of the shared battle-profiles document
pub const BATTLE_PROFILES_FILE: &str = "battle_profiles.pdf";

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    index: &'a str,
    #[serde(rename = "searchTerm")]
    search_term: &'a str,
    #[serde(rename = "gameSystem")]
    game_system: &'a str,
    language: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    id: HitId,
}

#[derive(Debug, Default, Deserialize)]
struct HitId {
    file: Option<String>,
}

/// Catalogue client over blocking HTTP.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    catalogue_url: String,
    asset_base: String,
}

impl HttpFetcher {
    /// Create a fetcher against the public catalogue
    pub fn new() -> Result<Self> {
        Self::with_urls(CATALOGUE_URL, ASSET_BASE_URL)
    }

    /// Create a fetcher against custom endpoints
    pub fn with_urls(catalogue_url: &str, asset_base: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            catalogue_url: catalogue_url.to_string(),
            asset_base: asset_base.to_string(),
        })
    }
}

impl DocumentFetcher for HttpFetcher {
    type Error = CliError;

    fn list(&self) -> Result<Vec<RemoteDocument>> {
        info!("Fetching document catalogue from {}", self.catalogue_url);
        let request = SearchRequest {
            index: "downloads_v2",
            search_term: "",
            game_system: "warhammer-age-of-sigmar",
            language: "english",
        };
        let response: SearchResponse = self
            .client
            .post(&self.catalogue_url)
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;
        info!("Catalogue lists {} documents", response.hits.len());

        Ok(response
            .hits
            .into_iter()
            .filter_map(|hit| {
                let file = hit.id.file.filter(|f| !f.is_empty())?;
                Some(RemoteDocument {
                    title: hit.title,
                    file,
                })
            })
            .collect())
    }

    fn fetch(&self, document: &RemoteDocument) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.asset_base, document.file);
        info!("Downloading {}", url);
        let bytes = self.client.get(&url).send()?.error_for_status()?.bytes()?;
        Ok(bytes.to_vec())
    }
}

/// One selected document and the local file name it is saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDownload {
    /// Catalogue entry
    pub document: RemoteDocument,
    /// Local file name
    pub filename: String,
}

/// The documents selected from a catalogue listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadPlan {
    /// Selected documents in download order
    pub downloads: Vec<PlannedDownload>,
    /// Every required document the listing lacked
    pub missing: Vec<String>,
}

impl DownloadPlan {
    /// Fail with every missing requirement at once
    pub fn check(&self) -> Result<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(CliError::MissingDocuments(self.missing.clone()))
        }
    }

    fn push(&mut self, document: &RemoteDocument, filename: String) {
        self.downloads.push(PlannedDownload {
            document: document.clone(),
            filename,
        });
    }
}

/// Select the documents to download from a catalogue listing.
pub fn plan_downloads(listing: &[RemoteDocument]) -> DownloadPlan {
    let mut plan = DownloadPlan::default();

    match listing.iter().find(|d| d.title.to_lowercase().contains("rules update")) {
        Some(document) => plan.push(document, RULES_UPDATE_FILE.to_string()),
        None => plan.missing.push(format!("{} not found", RULES_UPDATE_FILE)),
    }

    match listing.iter().find(|d| d.title.to_lowercase() == "battle profiles") {
        Some(document) => plan.push(document, BATTLE_PROFILES_FILE.to_string()),
        None => plan.missing.push(format!("{} not found", BATTLE_PROFILES_FILE)),
    }

    let mut factions = 0;
    for document in listing {
        let title = document.title.to_lowercase();
        if !title.contains("battle profiles") || title.contains("faction pack:") || title == "battle profiles" {
            continue;
        }
        let slug = faction_slug(&title);
        if slug.is_empty() {
            warn!("Cannot derive a faction name from '{}'", document.title);
            continue;
        }
        plan.push(document, format!("faction_{}_battle_profiles.pdf", slug));
        factions += 1;
    }
    if factions == 0 {
        plan.missing.push("No faction battle profiles PDFs found".to_string());
    }

    plan
}

/// Faction part of a battle-profile document title, as a file-name slug
pub fn faction_slug(title: &str) -> String {
    let mut slug = title.to_lowercase();
    for noise in ["battle profiles", "faction pack:", "faction", "pack:", ".pdf"] {
        slug = slug.replace(noise, "");
    }
    slug.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Recreate `dir` and download every planned document into it.
///
/// Found documents are saved even when others are missing; the missing
/// ones are then reported together.
pub fn download_all<F>(fetcher: &F, dir: &Path) -> Result<DownloadPlan>
where
    F: DocumentFetcher,
    F::Error: Into<CliError>,
{
    if dir.exists() {
        info!("Deleting existing '{}' directory", dir.display());
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;

    let listing = fetcher.list().map_err(Into::<CliError>::into)?;
    let plan = plan_downloads(&listing);
    for download in &plan.downloads {
        let bytes = fetcher.fetch(&download.document).map_err(Into::<CliError>::into)?;
        fs::write(dir.join(&download.filename), bytes)?;
        info!("Saved {}", download.filename);
    }
    plan.check()?;
    Ok(plan)
}
