//! Starting parameters for a run.

use colony_core::fixed::{Fixed64, f64_to_fixed64};
use colony_core::id::ResourceId;

/// Tile kind given to the landing site.
pub const LANDER_TILE: &str = "lander";

/// Resolved configuration for a new run.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub width: u32,
    pub height: u32,

    /// Kind of every tile before the lander is placed.
    pub terrain: String,

    /// Landing site, if the run starts with one.
    pub lander: Option<(u32, u32)>,

    /// Turn number of the first turn.
    pub first_turn: u32,

    pub population: u32,

    /// Initial labor pool. Defaults to the whole population.
    pub workers: Option<u32>,

    /// Fraction of the population added per turn.
    pub growth_rate: Fixed64,

    /// Resource consumed by each new colonist, if any.
    pub food: Option<ResourceId>,

    pub starting_resources: Vec<(ResourceId, u32)>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 12,
            terrain: "wasteland".to_string(),
            lander: Some((2, 2)),
            first_turn: 1,
            population: 5,
            workers: None,
            growth_rate: f64_to_fixed64(0.05),
            food: None,
            starting_resources: Vec::new(),
        }
    }
}
