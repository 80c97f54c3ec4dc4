//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::Result;
use crate::metadata::{BattleProfileOutput, DocumentMetadata, FaqOutput};
use crate::output::Formatter;
use crate::pages::JsonDocument;
use chrono::{Local, NaiveDate};
use muster_domain::{BattleProfileData, Overlay, PageSource};
use muster_extractor::{merge_overlays, ExtractionOutcome, Extractor};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const RULES_UPDATE: &str = "rules_update";
const BATTLE_PROFILES: &str = "battle_profiles";

/// Execute the extract command.
pub fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let input = args.input.unwrap_or_else(|| config.input_dir.clone());
    let output = args.output.unwrap_or_else(|| config.output_dir.clone());
    let overlays = args.overlays.unwrap_or_else(|| config.overlay_dir.clone());

    let extractor = Extractor::new(config.extractor.clone())?;
    let today = Local::now().date_naive();
    fs::create_dir_all(&output)?;

    if !args.no_faq {
        match extract_faq(&extractor, &input, &output, today)? {
            Some(path) => println!("{}", formatter.success(&format!("Wrote {}", path.display()))),
            None => println!(
                "{}",
                formatter.warning(&format!("{}.json not found in {}", RULES_UPDATE, input.display()))
            ),
        }
    }

    if !args.no_profiles {
        match extract_profiles(&extractor, &input, &output, &overlays)? {
            Some(outcome) => {
                println!(
                    "{}",
                    formatter.success(&format!(
                        "Wrote {} factions to {}",
                        outcome.data.factions.len(),
                        output.join("battleprofile.json").display()
                    ))
                );
                println!("{}", formatter.format_diagnostics(&outcome.diagnostics));
            }
            None => println!(
                "{}",
                formatter.warning(&format!("{}.json not found in {}", BATTLE_PROFILES, input.display()))
            ),
        }
    }

    Ok(())
}

/// Extract `faq.json` from the rules-update page dump.
///
/// Returns the written path, or `None` when the dump is absent.
pub fn extract_faq(
    extractor: &Extractor,
    input: &Path,
    output: &Path,
    today: NaiveDate,
) -> Result<Option<PathBuf>> {
    let dump = input.join(format!("{}.json", RULES_UPDATE));
    if !dump.exists() {
        warn!("{} not found", dump.display());
        return Ok(None);
    }

    info!("Processing FAQ from {}", dump.display());
    let document = JsonDocument::open(&dump)?;
    let sections = extractor.extract_faq(&document)?;
    let metadata = DocumentMetadata::for_file(
        &source_file(input, RULES_UPDATE),
        document.creation_date(),
        today,
    )?;

    let path = output.join("faq.json");
    write_json(&path, &FaqOutput::new(metadata, sections))?;
    Ok(Some(path))
}

/// Extract `battleprofile.json` from the shared and per-faction page dumps,
/// then apply overlays.
///
/// Returns the outcome, or `None` when the shared dump is absent.
pub fn extract_profiles(
    extractor: &Extractor,
    input: &Path,
    output: &Path,
    overlay_dir: &Path,
) -> Result<Option<ExtractionOutcome<BattleProfileData>>> {
    let shared_dump = input.join(format!("{}.json", BATTLE_PROFILES));
    if !shared_dump.exists() {
        warn!("{} not found", shared_dump.display());
        return Ok(None);
    }

    info!("Processing battle profiles from {}", input.display());
    let mut run = extractor.battle_profiles();
    run.ingest_shared(BATTLE_PROFILES, &JsonDocument::open(&shared_dump)?)?;
    for path in faction_dumps(input)? {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let document = JsonDocument::open(&path)?;
        run.ingest_faction(&name, &document)?;
    }
    let outcome = run.finish();

    let overlays = load_overlays(overlay_dir)?;
    let data = merge_overlays(outcome.data, &overlays);

    write_json(&output.join("battleprofile.json"), &BattleProfileOutput::new(data.clone()))?;
    Ok(Some(ExtractionOutcome {
        data,
        diagnostics: outcome.diagnostics,
    }))
}

/// Load every `*.json` overlay in `dir`, in file-name order.
///
/// A missing directory means no overlays.
pub fn load_overlays(dir: &Path) -> Result<Vec<Overlay>> {
    if !dir.is_dir() {
        info!("No overlay directory at {}", dir.display());
        return Ok(Vec::new());
    }

    let mut overlays = Vec::new();
    for path in sorted_files(dir, |name| name.ends_with(".json"))? {
        info!("Loading overlay {}", path.display());
        let contents = fs::read_to_string(&path)?;
        overlays.push(serde_json::from_str(&contents)?);
    }
    Ok(overlays)
}

/// `faction_*_battle_profiles.json` dumps in `dir`, in file-name order
fn faction_dumps(dir: &Path) -> Result<Vec<PathBuf>> {
    sorted_files(dir, |name| {
        name.starts_with("faction_") && name.ends_with("_battle_profiles.json")
    })
}

fn sorted_files(dir: &Path, keep: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(&keep);
        if matches && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// The PDF when present beside its dump, else the dump itself
fn source_file(input: &Path, stem: &str) -> PathBuf {
    let pdf = input.join(format!("{}.pdf", stem));
    if pdf.exists() {
        pdf
    } else {
        input.join(format!("{}.json", stem))
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use muster_domain::{DetectedTable, Page, Rect, TableCell, Word};
    use muster_extractor::{DiagnosticKind, ExtractorConfig};
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn line(text: &str, x0: f64, top: f64) -> Vec<Word> {
        let mut x = x0;
        text.split_whitespace()
            .map(|token| {
                let width = 6.0 * token.len() as f64;
                let word = Word::new(token, x, top, x + width, top + 10.0);
                x += width + 4.0;
                word
            })
            .collect()
    }

    fn profile_page(title: &str, published: &str, rows: &[&[&str]]) -> Page {
        let words = [("WARHAMMER", 10.0), ("AGE OF SIGMAR", 25.0), ("BATTLE PROFILES", 40.0), (title, 55.0)]
            .iter()
            .flat_map(|(text, top)| line(text, 20.0, *top))
            .collect();
        Page {
            words,
            tables: vec![DetectedTable {
                bbox: Rect::new(10.0, 200.0, 590.0, 780.0),
                rows: rows
                    .iter()
                    .map(|row| row.iter().map(|cell| TableCell::text(*cell)).collect())
                    .collect(),
            }],
            text: format!("BATTLE PROFILES\n{}", published),
            ..Page::default()
        }
    }

    fn faq_page() -> Page {
        let mut words = Vec::new();
        for (text, top) in [
            ("WARHAMMER", 10.0),
            ("AGE OF SIGMAR", 25.0),
            ("FREQUENTLY ASKED QUESTIONS", 40.0),
            ("CORE RULES", 55.0),
        ] {
            words.extend(line(text, 20.0, top));
        }
        for (text, top) in [("CHARGE", 120.0), ("Q: Can I charge twice?", 140.0), ("A: No.", 160.0)] {
            words.extend(line(text, 20.0, top));
        }
        Page {
            words,
            images: vec![Rect::new(0.0, 100.0, 600.0, 800.0)],
            ..Page::default()
        }
    }

    fn write_dump(dir: &Path, name: &str, creation_date: Option<&str>, pages: Vec<Page>) {
        let dump = json!({ "creation_date": creation_date, "pages": pages });
        fs::write(dir.join(name), dump.to_string()).unwrap();
    }

    const UNITS: &[&str] = &["UNITS", "UNIT SIZE", "POINTS", "RELEVANT KEYWORDS", "NOTES", "BASE SIZE"];

    fn extractor() -> Extractor {
        Extractor::new(ExtractorConfig::default()).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    #[test]
    fn test_extract_faq_writes_document() {
        let dir = TempDir::new().unwrap();
        write_dump(dir.path(), "rules_update.json", Some("D:20250612"), vec![faq_page()]);
        fs::write(dir.path().join("rules_update.pdf"), b"%PDF-1.7").unwrap();

        let path = extract_faq(&extractor(), dir.path(), dir.path(), today())
            .unwrap()
            .unwrap();
        let written: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();

        assert_eq!(written["type"], "faq");
        assert_eq!(written["filename"], "rules_update.pdf");
        assert_eq!(written["publishedDate"], "2025-06-12");
        assert_eq!(written["extractedDate"], "2025-07-01");
        assert_eq!(written["hash"].as_str().unwrap().len(), 64);
        assert_eq!(written["data"][0]["title"], "CORE RULES");
        assert_eq!(written["data"][0]["rules"][0]["questions"][0]["answer"], "No.");
    }

    #[test]
    fn test_extract_faq_without_dump() {
        let dir = TempDir::new().unwrap();
        let result = extract_faq(&extractor(), dir.path(), dir.path(), today()).unwrap();
        assert!(result.is_none());
        assert!(!dir.path().join("faq.json").exists());
    }

    #[test]
    fn test_extract_profiles_with_factions_and_overlays() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let overlays = TempDir::new().unwrap();

        write_dump(
            input.path(),
            "battle_profiles.json",
            None,
            vec![profile_page("SERAPHON", "June 2025", &[UNITS, &["Saurus Warriors", "10", "180", "Infantry", "", "32mm"]])],
        );
        write_dump(
            input.path(),
            "faction_skaven_battle_profiles.json",
            None,
            vec![profile_page("SKAVEN", "July 2025", &[UNITS, &["Clanrats", "20", "150", "Infantry", "", "25mm"]])],
        );
        write_dump(
            input.path(),
            "faction_sylvaneth_battle_profiles.json",
            Some("D:20240101"),
            vec![profile_page("SYLVANETH", "", &[UNITS, &["Dryads", "10", "100", "Infantry", "", "32mm"]])],
        );
        fs::write(input.path().join("notes.json"), "not a dump").unwrap();

        fs::write(
            overlays.path().join("01-seraphon.json"),
            r#"{"factions": [{"name": "SERAPHON", "battle_profiles": [{"name": "Saurus Warriors", "unit_size": "10", "points": 170}]}]}"#,
        )
        .unwrap();

        let outcome = extract_profiles(&extractor(), input.path(), output.path(), overlays.path())
            .unwrap()
            .unwrap();

        let names: Vec<&str> = outcome.data.factions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["SERAPHON", "SKAVEN"]);
        assert_eq!(outcome.diagnostics.count(DiagnosticKind::SkippedDocument), 1);
        assert_eq!(outcome.data.factions[0].battle_profiles[0].points, 170);

        let written: Value =
            serde_json::from_str(&fs::read_to_string(output.path().join("battleprofile.json")).unwrap()).unwrap();
        assert_eq!(written["type"], "battleprofile");
        assert_eq!(written["data"]["factions"][1]["battle_profiles"][0]["name"], "Clanrats");
    }

    #[test]
    fn test_load_overlays_sorted_and_optional() {
        let dir = TempDir::new().unwrap();
        assert!(load_overlays(&dir.path().join("absent")).unwrap().is_empty());

        fs::write(dir.path().join("b.json"), r#"{"factions": [{"name": "B"}]}"#).unwrap();
        fs::write(dir.path().join("a.json"), r#"{"factions": [{"name": "A"}]}"#).unwrap();
        fs::write(dir.path().join("readme.txt"), "ignored").unwrap();

        let overlays = load_overlays(dir.path()).unwrap();
        assert_eq!(overlays.len(), 2);
        assert_eq!(overlays[0].factions[0].name, "A");
        assert_eq!(overlays[1].factions[0].name, "B");
    }

    #[test]
    fn test_malformed_overlay_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.json"), "{").unwrap();
        assert!(load_overlays(dir.path()).is_err());
    }
}
