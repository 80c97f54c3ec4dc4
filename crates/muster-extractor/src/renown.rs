//! Regiment of renown rows

use std::sync::LazyLock;

use indexmap::IndexMap;
use muster_domain::{name_key, normalize_text, RegimentOfRenown};
use regex::Regex;

use crate::diagnostics::{DiagnosticKind, Diagnostics};

static POINTS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+-]?\d+").unwrap());
static LEADING_COUNT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\s*").unwrap());

const BULLET: char = '\u{2022}';

/// Leading signed integer of a points cell, 0 when there is none
pub fn parse_points(cell: &str) -> i64 {
    POINTS_RE
        .find(cell.trim())
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Unit name → number of bullet lines naming it.
///
/// The printed count in front of each unit is discarded.
pub fn parse_unit_summary(summary: &str) -> IndexMap<String, u32> {
    let mut units = IndexMap::new();
    for line in summary.replace('\n', " ").split(BULLET) {
        let line = name_key(line);
        if line.is_empty() {
            continue;
        }
        let name = LEADING_COUNT_RE.replace(&line, "").trim().to_string();
        *units.entry(name).or_insert(0) += 1;
    }
    units
}

/// Armies listed after the first colon of the notes cell
pub fn parse_allowed_armies(notes: &str) -> Vec<String> {
    let Some((_, armies)) = notes.split_once(':') else {
        return Vec::new();
    };
    armies
        .split(',')
        .map(|army| normalize_text(army.trim()))
        .filter(|army| !army.is_empty())
        .collect()
}

/// Parse one table row (`name`, unit summary, points, notes).
///
/// Rows without a name are skipped silently; rows costing zero or less are
/// dropped with a diagnostic.
pub fn parse_row(row: &[String], diagnostics: &mut Diagnostics) -> Option<RegimentOfRenown> {
    let cell = |index: usize| row.get(index).map(String::as_str).unwrap_or("");

    let name = name_key(cell(0));
    if name.is_empty() {
        return None;
    }

    let points = parse_points(cell(2));
    if points <= 0 {
        diagnostics.record(
            DiagnosticKind::NonPositiveRenown,
            name.as_str(),
            format!("points '{}' parsed as {}", cell(2).trim(), points),
        );
        return None;
    }

    Some(RegimentOfRenown {
        units: parse_unit_summary(cell(1)),
        allowed_armies: parse_allowed_armies(cell(3)),
        name,
        points,
    })
}
