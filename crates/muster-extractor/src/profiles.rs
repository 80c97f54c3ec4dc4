//! Battle-profile tree builder
//!
//! Ingestion upserts profiles page by page and keeps each unit's raw
//! regiment-option phrases aside. [`BattleProfileBuilder::finalize`] consumes
//! the builder: notes are interpreted, the corpora are built from everything
//! ingested, and only then are the option phrases resolved.

use indexmap::IndexMap;
use muster_domain::{
    name_key, BattleProfileData, Faction, OtherProfile, RegimentOfRenown, Table,
    UniversalManifestation, UnitProfile,
};
use tracing::{debug, info};

use crate::classifier::{classify, Column, ColumnMap, TableKind};
use crate::config::ExtractorConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::notes::apply_notes;
use crate::regiment_option::{resolve_options, Corpora};
use crate::renown::{parse_points, parse_row};
use crate::segmenter::TableLayout;

const RENOWN_TITLE: &str = "REGIMENTS OF RENOWN";
const LEGENDS_MARKER: &str = "LEGENDS";

/// A unit profile with its option phrases awaiting resolution
#[derive(Debug, Clone, Default)]
struct PendingUnit {
    profile: UnitProfile,
    option_phrases: Vec<String>,
}

#[derive(Debug, Clone, Default)]
struct FactionEntry {
    units: IndexMap<String, PendingUnit>,
    other: IndexMap<String, OtherProfile>,
}

/// Accumulates factions, manifestations and regiments of renown across every
/// battle-profile document of a run
#[derive(Debug)]
pub struct BattleProfileBuilder {
    config: ExtractorConfig,
    factions: IndexMap<String, FactionEntry>,
    manifestations: IndexMap<String, UniversalManifestation>,
    renown: IndexMap<String, RegimentOfRenown>,
}

impl BattleProfileBuilder {
    /// Create an empty builder
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            config,
            factions: IndexMap::new(),
            manifestations: IndexMap::new(),
            renown: IndexMap::new(),
        }
    }

    /// Number of factions seen so far
    pub fn faction_count(&self) -> usize {
        self.factions.len()
    }

    /// Ingest the tables of one segmented page
    pub fn process_page(&mut self, page: usize, layout: &TableLayout, diagnostics: &mut Diagnostics) {
        if layout.tables.is_empty() {
            return;
        }

        let Some(title) = layout
            .outside
            .get(self.config.profile_title_line)
            .map(|line| name_key(line))
            .filter(|line| !line.is_empty())
        else {
            diagnostics.record(
                DiagnosticKind::MissingTitle,
                format!("page {}", page),
                format!("no title line; skipped {} tables", layout.tables.len()),
            );
            return;
        };

        if title == RENOWN_TITLE {
            for table in &layout.tables {
                self.process_renown(table, diagnostics);
            }
            return;
        }

        for table in &layout.tables {
            let kind = classify(table);
            debug!("Page {}: {:?} table under '{}'", page, kind, title);
            match kind {
                TableKind::Heroes | TableKind::Units | TableKind::LegendsUnits | TableKind::LegendsHeroes => {
                    if kind.is_legends() {
                        self.process_legends(&title, table, diagnostics);
                    } else if let Some((header, rows)) = table.split_first() {
                        self.process_units(&title, header, rows, false, diagnostics);
                    }
                }
                TableKind::Other => self.process_other(&title, table, diagnostics),
                TableKind::UniversalManifestations => self.process_manifestations(table),
                TableKind::RegimentOfRenown => self.process_renown(table, diagnostics),
                TableKind::Unknown => {
                    let header = table.first().map(|row| row.join(" | ")).unwrap_or_default();
                    diagnostics.record(
                        DiagnosticKind::UnknownTable,
                        title.as_str(),
                        format!("unrecognised header: {}", name_key(&header)),
                    );
                }
            }
        }
    }

    /// Resolve everything ingested and produce the output tree.
    ///
    /// Notes run first so their subhero categories feed the corpora; option
    /// phrases are resolved last.
    pub fn finalize(mut self, diagnostics: &mut Diagnostics) -> BattleProfileData {
        for entry in self.factions.values_mut() {
            for pending in entry.units.values_mut() {
                apply_notes(&mut pending.profile, diagnostics);
            }
        }

        let corpora = self.corpora();
        info!(
            "Resolving options against {} keywords, {} subhero categories",
            corpora.keywords().len(),
            self.subhero_categories().count()
        );

        let mut factions = Vec::with_capacity(self.factions.len());
        for (name, entry) in self.factions {
            let mut battle_profiles = Vec::with_capacity(entry.units.len());
            for (_, pending) in entry.units {
                let mut profile = pending.profile;
                profile.regiment_options =
                    resolve_options(&profile.name, &pending.option_phrases, &corpora, diagnostics);

                if profile.has_empty_size() {
                    diagnostics.record(
                        DiagnosticKind::EmptyUnitSize,
                        profile.name.as_str(),
                        format!("unit size '{}' in {}; excluded", profile.unit_size, name),
                    );
                    continue;
                }
                battle_profiles.push(profile);
            }
            factions.push(Faction {
                name,
                battle_profiles,
                other: entry.other.into_values().collect(),
            });
        }

        BattleProfileData {
            universal_manifestations: self.manifestations.into_values().collect(),
            regiments_of_renown: self.renown.into_values().collect(),
            factions,
        }
    }

    fn subhero_categories(&self) -> impl Iterator<Item = &String> {
        self.factions
            .values()
            .flat_map(|entry| entry.units.values())
            .flat_map(|pending| pending.profile.subhero_categories.iter())
    }

    fn corpora(&self) -> Corpora {
        let profiles = || {
            self.factions
                .values()
                .flat_map(|entry| entry.units.values())
                .map(|pending| &pending.profile)
        };
        let keywords = self
            .factions
            .keys()
            .cloned()
            .chain(profiles().flat_map(|p| p.keywords.iter().cloned()));
        let unit_names = profiles().map(|p| p.name.clone());
        Corpora::new(keywords, unit_names, self.subhero_categories().cloned())
    }

    fn faction(&mut self, name: &str) -> &mut FactionEntry {
        self.factions.entry(name.to_string()).or_default()
    }

    fn process_units(
        &mut self,
        faction: &str,
        header: &[String],
        rows: &[Vec<String>],
        legends: bool,
        diagnostics: &mut Diagnostics,
    ) {
        let kind = classify(&[header.to_vec()]);
        let columns = ColumnMap::from_header(header);
        report_missing(&columns, kind, faction, diagnostics);

        let hero = header
            .first()
            .map(|cell| cell.to_lowercase().contains("hero"))
            .unwrap_or(false);

        let entry = self.faction(faction);
        for row in rows {
            let name = row.first().map(|cell| name_key(cell)).unwrap_or_default();
            if name.is_empty() {
                continue;
            }
            let pending = entry
                .units
                .entry(name.clone())
                .or_insert_with(|| PendingUnit {
                    profile: UnitProfile::new(name),
                    option_phrases: Vec::new(),
                });
            read_unit_row(pending, &columns, row);
            pending.profile.legends |= legends;
            pending.profile.hero |= hero;
        }
    }

    /// A Legends table either heads itself ("LEGENDS UNITS" first) and
    /// belongs to the page's faction, or carries its own faction name in the
    /// first row above the header.
    fn process_legends(&mut self, title: &str, table: &Table, diagnostics: &mut Diagnostics) {
        let Some(first) = table.first() else {
            return;
        };
        let heads_itself = first
            .first()
            .map(|cell| cell.to_uppercase().contains(LEGENDS_MARKER))
            .unwrap_or(false);

        if heads_itself {
            self.process_units(title, first, &table[1..], true, diagnostics);
        } else if let Some(header) = table.get(1) {
            let faction = first.first().map(|cell| name_key(cell)).unwrap_or_default();
            let faction = if faction.is_empty() { title.to_string() } else { faction };
            self.process_units(&faction, header, &table[2..], true, diagnostics);
        }
    }

    /// Rows keyed by the second column
    fn process_other(&mut self, faction: &str, table: &Table, diagnostics: &mut Diagnostics) {
        let Some((header, rows)) = table.split_first() else {
            return;
        };
        let columns = ColumnMap::from_header(header);
        report_missing(&columns, TableKind::Other, faction, diagnostics);

        let entry = self.faction(faction);
        for row in rows {
            let name = row.get(1).map(|cell| name_key(cell)).unwrap_or_default();
            if name.is_empty() {
                continue;
            }
            let other = entry.other.entry(name.clone()).or_insert_with(|| OtherProfile {
                name,
                ..OtherProfile::default()
            });
            if let Some(kind) = columns.cell(row, Column::Type) {
                other.kind = name_key(kind);
            }
            if let Some(points) = columns.cell(row, Column::Points) {
                other.points = parse_points(points);
            }
            if let Some(notes) = columns.cell(row, Column::Notes) {
                other.notes = name_key(notes);
            }
        }
    }

    fn process_manifestations(&mut self, table: &Table) {
        let Some((header, rows)) = table.split_first() else {
            return;
        };
        let columns = ColumnMap::from_header(header);
        for row in rows {
            let name = columns.cell(row, Column::Name).map(name_key).unwrap_or_default();
            if name.is_empty() {
                continue;
            }
            let points = columns.cell(row, Column::Points).map(parse_points).unwrap_or(0);
            self.manifestations
                .insert(name.clone(), UniversalManifestation { name, points });
        }
    }

    fn process_renown(&mut self, table: &Table, diagnostics: &mut Diagnostics) {
        let skip = usize::from(classify(table) == TableKind::RegimentOfRenown);
        for row in table.iter().skip(skip) {
            if let Some(regiment) = parse_row(row, diagnostics) {
                self.renown.insert(regiment.name.clone(), regiment);
            }
        }
    }
}

fn report_missing(columns: &ColumnMap, kind: TableKind, subject: &str, diagnostics: &mut Diagnostics) {
    for column in columns.missing(kind) {
        diagnostics.record(
            DiagnosticKind::MissingColumn,
            subject,
            format!("{:?} table without {} column", kind, column.label()),
        );
    }
}

fn comma_list(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(name_key)
        .filter(|item| !item.is_empty())
        .collect()
}

/// Copy every non-empty cell the header carries into the pending profile.
///
/// Notes accumulate across every row naming the unit; other cells are
/// replaced by the latest row.
fn read_unit_row(pending: &mut PendingUnit, columns: &ColumnMap, row: &[String]) {
    let cell = |column| columns.cell(row, column).filter(|text| !text.trim().is_empty());
    let profile = &mut pending.profile;

    if let Some(size) = cell(Column::UnitSize) {
        profile.unit_size = name_key(size);
        profile.reinforceable = profile.unit_size != "1";
    }
    if let Some(points) = cell(Column::Points) {
        profile.points = parse_points(points);
    }
    if let Some(keywords) = cell(Column::RelevantKeywords) {
        profile.keywords = comma_list(keywords);
    }
    if let Some(options) = cell(Column::RegimentOptions) {
        pending.option_phrases = comma_list(options);
    }
    if let Some(notes) = cell(Column::Notes) {
        for note in name_key(notes).split('.').map(str::trim) {
            if !note.is_empty() && !profile.notes.iter().any(|seen| seen == note) {
                profile.notes.push(note.to_string());
            }
        }
    }
    if let Some(base) = cell(Column::BaseSize) {
        profile.base_size = Some(name_key(base));
    }
}
