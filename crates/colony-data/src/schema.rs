//! On-disk shapes of the data files.
//!
//! Everything here refers to other entries by name. The structs are
//! deserialized from RON, JSON or TOML and then resolved into ids by
//! [`crate::game_data`].

use colony_core::fixed::fixed64_to_f64;
use colony_game::GameConfig;
use colony_quest::{ComparisonOp, Ending};
use colony_tech_tree::ScienceCost;
use serde::Deserialize;

// ===========================================================================
// Config
// ===========================================================================

/// The `config` file. Every field is optional and falls back to
/// [`GameConfig::default`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConfigData {
    pub width: u32,
    pub height: u32,
    pub terrain: String,
    pub lander: Option<(u32, u32)>,
    pub first_turn: u32,
    pub population: u32,
    pub workers: Option<u32>,
    pub growth_rate: f64,

    /// Resource type names, registered in this order.
    pub resources: Vec<String>,

    pub food: Option<String>,

    /// `(resource name, quantity)` pairs.
    pub starting_resources: Vec<(String, u32)>,
}

impl Default for ConfigData {
    fn default() -> Self {
        let config = GameConfig::default();
        Self {
            width: config.width,
            height: config.height,
            terrain: config.terrain,
            lander: config.lander,
            first_turn: config.first_turn,
            population: config.population,
            workers: config.workers,
            growth_rate: fixed64_to_f64(config.growth_rate),
            resources: Vec::new(),
            food: None,
            starting_resources: Vec::new(),
        }
    }
}

// ===========================================================================
// Technologies
// ===========================================================================

/// One entry of the `technologies` file.
#[derive(Debug, Clone, Deserialize)]
pub struct TechData {
    pub name: String,

    /// Names of technologies declared earlier in the file.
    #[serde(default)]
    pub prerequisites: Vec<String>,

    /// Omitted costs mean the technology is free.
    #[serde(default)]
    pub costs: Option<Vec<ScienceCost>>,

    #[serde(default = "default_true")]
    pub visible: bool,
}

fn default_true() -> bool {
    true
}

// ===========================================================================
// Quests
// ===========================================================================

/// One entry of the `quests` file. The first entry is the entry stage.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestStageData {
    pub name: String,
    pub description: String,

    #[serde(default)]
    pub hint: Option<String>,

    #[serde(default)]
    pub win: bool,

    #[serde(default)]
    pub lose: bool,

    #[serde(default)]
    pub ending: Option<Ending>,

    /// Checked in file order.
    #[serde(default)]
    pub transitions: Vec<TransitionData>,
}

/// A guarded edge to the stage named `to`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionData {
    pub to: String,
    pub when: ConditionData,
}

/// A quest condition with names in place of ids.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionData {
    Always,
    Turn {
        op: ComparisonOp,
        value: i64,
    },
    Population {
        op: ComparisonOp,
        value: i64,
    },
    Resource {
        resource: String,
        op: ComparisonOp,
        value: i64,
    },
    TileCount {
        kind: String,
        op: ComparisonOp,
        value: i64,
    },
    /// Shorthand for a tile count of at least one.
    TileExists(String),
    TechUnlocked(String),
    All(Vec<ConditionData>),
    Any(Vec<ConditionData>),
    Not(Box<ConditionData>),
}
