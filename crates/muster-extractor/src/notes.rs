//! Note interpretation
//!
//! Each period-split note fragment is tested against a fixed, prioritised
//! rule list. The first matching rule wins, so a fragment has at most one
//! effect on its profile.

use std::sync::LazyLock;

use muster_domain::UnitProfile;
use regex::Regex;

use crate::diagnostics::{DiagnosticKind, Diagnostics};

static SUBHERO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^This Hero can join an eligible regiment as(?: (?:a|an))? (.+)$").unwrap()
});
static REQUIRED_LEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^This unit can only be taken in (.+?)(?:'s)? regiment").unwrap()
});
static UNDERSIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^You can include 1 unit of this type for each (.+?) in your army").unwrap()
});
static RETIRING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^This unit will move to Warhammer Legends on (.+)$").unwrap());
static EXCLUSIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^You cannot include this unit and (.+?) in the same army").unwrap()
});

const CANNOT_REINFORCE: &str = "This unit cannot be reinforced";
const CAN_REINFORCE: &str = "This unit can be reinforced";
const JOINS_REGIMENT: &str = "This Hero can join";
const MATCHED_PLAY_ERRATA: &str = "This unit is legal for Matched Play for battles fought using the General's Handbook 2025-26 battlepack";
const ERRATA_UNIT_MARKER: &str = "Scourge of Ghyran";

/// Structural effect of one recognised note fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEffect {
    /// The hero fills a subhero category in other regiments
    SubheroCategory(String),
    /// reinforceable = false
    CannotReinforce,
    /// Generic "can join" wording; handled by the leader's options
    JoinsRegiment,
    /// The unit must be taken in this leader's regiment
    RequiredLeader(String),
    /// Known matched-play errata; nothing to record
    Errata,
    /// reinforceable = true
    CanReinforce,
    /// One unit allowed per unit of this name
    UndersizeCondition(String),
    /// Date the unit moves to Legends
    RetiringOn(String),
    /// Unit that cannot share an army with this one
    ExclusiveWith(String),
}

impl NoteEffect {
    /// Apply the effect to `profile`
    pub fn apply(self, profile: &mut UnitProfile) {
        match self {
            NoteEffect::SubheroCategory(category) => profile.subhero_categories.push(category),
            NoteEffect::CannotReinforce => profile.reinforceable = false,
            NoteEffect::CanReinforce => profile.reinforceable = true,
            NoteEffect::RequiredLeader(name) => profile.required_leader = name,
            NoteEffect::UndersizeCondition(name) => profile.undersize_condition = name,
            NoteEffect::RetiringOn(date) => profile.retiring_on = date,
            NoteEffect::ExclusiveWith(name) => profile.exclusive_with = name,
            NoteEffect::JoinsRegiment | NoteEffect::Errata => {}
        }
    }
}

fn capture(re: &Regex, note: &str) -> Option<String> {
    re.captures(note)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Interpret one fragment of a unit's notes.
///
/// Returns `None` for fragments no rule recognises.
pub fn interpret(note: &str, unit_name: &str) -> Option<NoteEffect> {
    if let Some(category) = capture(&SUBHERO_RE, note) {
        return Some(NoteEffect::SubheroCategory(category));
    }
    if note == CANNOT_REINFORCE {
        return Some(NoteEffect::CannotReinforce);
    }
    if note.starts_with(JOINS_REGIMENT) {
        return Some(NoteEffect::JoinsRegiment);
    }
    if let Some(leader) = capture(&REQUIRED_LEADER_RE, note) {
        return Some(NoteEffect::RequiredLeader(leader));
    }
    if note.contains(MATCHED_PLAY_ERRATA) && unit_name.contains(ERRATA_UNIT_MARKER) {
        return Some(NoteEffect::Errata);
    }
    if note.starts_with(CAN_REINFORCE) {
        return Some(NoteEffect::CanReinforce);
    }
    if let Some(unit) = capture(&UNDERSIZE_RE, note) {
        return Some(NoteEffect::UndersizeCondition(unit));
    }
    if let Some(date) = capture(&RETIRING_RE, note) {
        return Some(NoteEffect::RetiringOn(date));
    }
    capture(&EXCLUSIVE_RE, note).map(NoteEffect::ExclusiveWith)
}

/// Apply every note of `profile` in order, recording unrecognised fragments
pub fn apply_notes(profile: &mut UnitProfile, diagnostics: &mut Diagnostics) {
    let notes = profile.notes.clone();
    for note in &notes {
        match interpret(note, &profile.name) {
            Some(effect) => effect.apply(profile),
            None => diagnostics.record(
                DiagnosticKind::UnhandledNote,
                profile.name.as_str(),
                format!("unhandled note: {}", note),
            ),
        }
    }
}
