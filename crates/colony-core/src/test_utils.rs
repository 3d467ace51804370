//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so downstream
//! crates can enable them through the `test-utils` feature.

use crate::conversion::Conversion;
use crate::fixed::Fixed64;
use crate::id::{ConversionId, ResourceId};
use crate::inventory::Stockpile;
use crate::world::World;

// ===========================================================================
// Resources
// ===========================================================================

pub fn food() -> ResourceId {
    ResourceId(0)
}
pub fn water() -> ResourceId {
    ResourceId(1)
}
pub fn ore() -> ResourceId {
    ResourceId(2)
}
pub fn metal() -> ResourceId {
    ResourceId(3)
}
pub fn power() -> ResourceId {
    ResourceId(4)
}

// ===========================================================================
// Conversions
// ===========================================================================

/// A conversion that only produces (one unit of ore).
pub fn free_conversion(name: &str) -> Conversion {
    Conversion::new(name).with_output(ore(), 1)
}

/// A conversion that turns one ore into one metal.
pub fn costly_conversion(name: &str) -> Conversion {
    Conversion::new(name)
        .with_input(ore(), 1)
        .with_output(metal(), 1)
}

// ===========================================================================
// Worlds
// ===========================================================================

/// A world with one tile per conversion, laid out in a single row, each
/// conversion assigned the given priority. `true` entries are costly.
pub fn world_with_priorities(entries: &[(bool, i32)]) -> (World, Vec<ConversionId>) {
    let width = entries.len().max(1) as u32;
    let mut world = World::new(width, 1, "wasteland");
    let mut ids = Vec::with_capacity(entries.len());
    for (i, (costly, priority)) in entries.iter().enumerate() {
        let name = format!("conversion_{i}");
        let conversion = if *costly {
            costly_conversion(&name)
        } else {
            free_conversion(&name)
        };
        let id = world
            .add_conversion(i as u32, 0, conversion)
            .expect("tile is in bounds");
        world.set_priority(id, *priority).expect("conversion exists");
        ids.push(id);
    }
    (world, ids)
}

/// A square world with `per_tile` alternating free/costly conversions on
/// every tile. Used by benchmarks.
pub fn dense_world(side: u32, per_tile: u32) -> World {
    let mut world = World::new(side, side, "wasteland");
    for y in 0..side {
        for x in 0..side {
            for k in 0..per_tile {
                let conversion = if k % 2 == 0 {
                    free_conversion("mine")
                } else {
                    costly_conversion("smelter")
                };
                world
                    .add_conversion(x, y, conversion)
                    .expect("tile is in bounds");
            }
        }
    }
    world
}

/// A stockpile that never grows.
pub fn static_stockpile(population: u32) -> Stockpile {
    Stockpile::new(population, Fixed64::ZERO)
}
