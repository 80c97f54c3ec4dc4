//! Battle-profile records
//!
//! Field names on the wire follow the renderer that consumes
//! `battleprofile.json`, which mixes snake_case and camelCase.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Composition rule of a leader unit, resolved against the global corpora
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimentOption {
    /// Minimum number of companions
    pub min: i32,

    /// Maximum number of companions, [`RegimentOption::UNBOUNDED`] for "Any"
    pub max: i32,

    /// Required keywords
    pub keywords: Vec<String>,

    /// Excluded keywords ("non-X")
    #[serde(rename = "nonKeywords")]
    pub non_keywords: Vec<String>,

    /// Subhero categories that satisfy the option
    pub subhero_categories: Vec<String>,

    /// Explicit unit names that satisfy the option
    pub unit_names: Vec<String>,

    /// Set when the source phrase was the literal "None" marker
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub none: bool,
}

impl RegimentOption {
    /// Sentinel `max` for an unbounded quantity
    pub const UNBOUNDED: i32 = -1;

    /// The literal "None" marker option
    pub fn none_marker() -> Self {
        Self {
            none: true,
            ..Self::default()
        }
    }

    /// True when at least one reference list is populated
    pub fn has_references(&self) -> bool {
        !(self.keywords.is_empty()
            && self.non_keywords.is_empty()
            && self.subhero_categories.is_empty()
            && self.unit_names.is_empty())
    }

    /// An option is kept iff it is the "None" marker, or it allows at least
    /// one companion and references something.
    pub fn is_valid(&self) -> bool {
        self.none || ((self.max == Self::UNBOUNDED || self.max > 0) && self.has_references())
    }
}

/// A unit's battle profile
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitProfile {
    /// Unit name (normalised)
    pub name: String,

    /// Unit size as printed ("1", "10", ...)
    pub unit_size: String,

    /// Points cost
    pub points: i64,

    /// Relevant keywords
    pub keywords: Vec<String>,

    /// Note sentences, period-split
    pub notes: Vec<String>,

    /// Base size as printed
    pub base_size: Option<String>,

    /// Whether the unit may be reinforced
    pub reinforceable: bool,

    /// Categories this hero fills when joining another regiment
    pub subhero_categories: Vec<String>,

    /// Resolved regiment options
    pub regiment_options: Vec<RegimentOption>,

    /// Leader whose regiment this unit must join
    #[serde(rename = "requiredLeader")]
    pub required_leader: String,

    /// Unit whose presence allows one of this unit
    #[serde(rename = "undersizeCondition")]
    pub undersize_condition: String,

    /// Date the unit moves to Legends
    #[serde(rename = "retiringOn")]
    pub retiring_on: String,

    /// Unit that cannot be fielded alongside this one
    #[serde(rename = "exclusiveWith")]
    pub exclusive_with: String,

    /// Listed in a Legends table
    pub legends: bool,

    /// Listed in a heroes table
    pub hero: bool,
}

impl UnitProfile {
    /// Create an empty profile for `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// True if the unit size is empty or zero
    pub fn has_empty_size(&self) -> bool {
        let size = self.unit_size.trim();
        size.is_empty() || size.parse::<i64>().map(|n| n == 0).unwrap_or(false)
    }
}

/// A non-unit faction entry (spell lores, manifestations, terrain, ...)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherProfile {
    /// Entry name
    pub name: String,

    /// Entry type as printed
    #[serde(rename = "type")]
    pub kind: String,

    /// Points cost
    pub points: i64,

    /// Notes text
    pub notes: String,
}

/// A faction-independent manifestation with a flat cost
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversalManifestation {
    /// Manifestation name
    pub name: String,

    /// Points cost
    pub points: i64,
}

/// A fixed multi-unit group bought as one list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimentOfRenown {
    /// Regiment name
    pub name: String,

    /// Unit name → number of summary lines naming it
    pub units: IndexMap<String, u32>,

    /// Points cost
    pub points: i64,

    /// Armies that may take the regiment
    #[serde(rename = "allowedArmies")]
    pub allowed_armies: Vec<String>,
}

/// An army grouping and its profiles
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Faction {
    /// Faction name (normalised)
    pub name: String,

    /// Unit profiles in first-seen order
    #[serde(default)]
    pub battle_profiles: Vec<UnitProfile>,

    /// Other profiles in first-seen order
    #[serde(default)]
    pub other: Vec<OtherProfile>,
}

/// The complete battle-profile extraction result
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattleProfileData {
    /// Universal manifestations
    pub universal_manifestations: Vec<UniversalManifestation>,

    /// Regiments of renown
    pub regiments_of_renown: Vec<RegimentOfRenown>,

    /// Factions in first-seen order
    pub factions: Vec<Faction>,
}

/// One faction entry of an overlay document
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayFaction {
    /// Faction name to patch or add
    pub name: String,

    /// Profiles replacing or extending the extracted ones
    pub battle_profiles: Vec<UnitProfile>,

    /// Other profiles, used when the faction is added wholesale
    pub other: Vec<OtherProfile>,
}

impl From<OverlayFaction> for Faction {
    fn from(overlay: OverlayFaction) -> Self {
        Self {
            name: overlay.name,
            battle_profiles: overlay.battle_profiles,
            other: overlay.other,
        }
    }
}

/// A hand-authored patch document
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Overlay {
    /// Factions to patch or add
    pub factions: Vec<OverlayFaction>,
}
