//! Table classification and header → column mapping

use std::collections::HashMap;

use muster_domain::name_key;

/// Semantic kind of a battle-profile table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// Hero units
    Heroes,
    /// Non-hero units
    Units,
    /// Faction extras keyed by name (lores, terrain, ...)
    Other,
    /// Faction-independent manifestations
    UniversalManifestations,
    /// Regiments of renown
    RegimentOfRenown,
    /// Units moved to Legends
    LegendsUnits,
    /// Heroes moved to Legends
    LegendsHeroes,
    /// Anything else; callers skip it
    Unknown,
}

impl TableKind {
    /// Columns a table of this kind is expected to carry
    pub fn expected_columns(&self) -> &'static [Column] {
        use Column::*;
        match self {
            TableKind::Heroes => &[UnitSize, Points, RegimentOptions, Notes, BaseSize],
            TableKind::Units => &[UnitSize, Points, RelevantKeywords, Notes, BaseSize],
            TableKind::LegendsUnits | TableKind::LegendsHeroes => &[UnitSize, Points, Notes, BaseSize],
            TableKind::Other => &[Type, Name, Points, Notes],
            TableKind::UniversalManifestations => &[Name, Points, Notes],
            TableKind::RegimentOfRenown | TableKind::Unknown => &[],
        }
    }

    /// True for the Legends variants
    pub fn is_legends(&self) -> bool {
        matches!(self, TableKind::LegendsUnits | TableKind::LegendsHeroes)
    }
}

const HEROES_HEADER: &[&str] = &["HEROES", "UNIT SIZE", "POINTS", "REGIMENT OPTIONS", "NOTES", "BASE SIZE"];
const UNITS_HEADER: &[&str] = &["UNITS", "UNIT SIZE", "POINTS", "RELEVANT KEYWORDS", "NOTES", "BASE SIZE"];
const OTHER_HEADER: &[&str] = &["TYPE", "NAME", "POINTS", "NOTES"];
const MANIFESTATION_HEADER: &[&str] = &["NAME", "POINTS", "NOTES"];
const RENOWN_MARKER: &str = "UNIT SUMMARY";
const LEGENDS_UNITS_MARKER: &str = "LEGENDS UNITS";
const LEGENDS_HEROES_MARKER: &str = "LEGENDS HEROES";

/// Classify a table from its header row (and second row for Legends).
///
/// Required tokens are matched as an order-independent subset of the header
/// cells; the first matching kind in priority order wins.
pub fn classify(table: &[Vec<String>]) -> TableKind {
    let Some(first) = table.first() else {
        return TableKind::Unknown;
    };
    let header = header_cells(first);
    let second = table.get(1).map(|row| header_cells(row)).unwrap_or_default();

    let includes = |cells: &[String], required: &[&str]| required.iter().all(|r| cells.iter().any(|c| c == r));
    let has = |cells: &[String], marker: &str| cells.iter().any(|c| c == marker);

    if includes(&header, HEROES_HEADER) {
        TableKind::Heroes
    } else if includes(&header, UNITS_HEADER) {
        TableKind::Units
    } else if includes(&header, OTHER_HEADER) {
        TableKind::Other
    } else if includes(&header, MANIFESTATION_HEADER) {
        TableKind::UniversalManifestations
    } else if has(&header, RENOWN_MARKER) {
        TableKind::RegimentOfRenown
    } else if has(&header, LEGENDS_UNITS_MARKER) || has(&second, LEGENDS_UNITS_MARKER) {
        TableKind::LegendsUnits
    } else if has(&header, LEGENDS_HEROES_MARKER) || has(&second, LEGENDS_HEROES_MARKER) {
        TableKind::LegendsHeroes
    } else {
        TableKind::Unknown
    }
}

fn header_cells(row: &[String]) -> Vec<String> {
    row.iter().map(|cell| name_key(cell)).collect()
}

/// A profile field that is read from a named header column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// "UNIT SIZE"
    UnitSize,
    /// "POINTS"
    Points,
    /// "RELEVANT KEYWORDS"
    RelevantKeywords,
    /// "REGIMENT OPTIONS"
    RegimentOptions,
    /// "NOTES"
    Notes,
    /// "BASE SIZE"
    BaseSize,
    /// "TYPE"
    Type,
    /// "NAME"
    Name,
}

impl Column {
    const ALL: [Column; 8] = [
        Column::UnitSize,
        Column::Points,
        Column::RelevantKeywords,
        Column::RegimentOptions,
        Column::Notes,
        Column::BaseSize,
        Column::Type,
        Column::Name,
    ];

    /// Header label as printed
    pub fn label(&self) -> &'static str {
        match self {
            Column::UnitSize => "UNIT SIZE",
            Column::Points => "POINTS",
            Column::RelevantKeywords => "RELEVANT KEYWORDS",
            Column::RegimentOptions => "REGIMENT OPTIONS",
            Column::Notes => "NOTES",
            Column::BaseSize => "BASE SIZE",
            Column::Type => "TYPE",
            Column::Name => "NAME",
        }
    }
}

/// Positions of the known columns within one table's header
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    positions: HashMap<Column, usize>,
}

impl ColumnMap {
    /// Map every known column present in `header` to its index
    pub fn from_header(header: &[String]) -> Self {
        let cells = header_cells(header);
        let positions = Column::ALL
            .iter()
            .filter_map(|column| {
                cells
                    .iter()
                    .position(|cell| cell == column.label())
                    .map(|index| (*column, index))
            })
            .collect();
        Self { positions }
    }

    /// Expected columns of `kind` that this header lacks
    pub fn missing(&self, kind: TableKind) -> Vec<Column> {
        kind.expected_columns()
            .iter()
            .filter(|column| !self.positions.contains_key(*column))
            .copied()
            .collect()
    }

    /// The cell of `row` under `column`; `None` when the header lacks the
    /// column or the row is short.
    pub fn cell<'r>(&self, row: &'r [String], column: Column) -> Option<&'r str> {
        self.positions
            .get(&column)
            .and_then(|&index| row.get(index))
            .map(String::as_str)
    }
}
