//! Colony Core -- the per-turn simulation primitives for the colony game.
//!
//! This crate owns the world of tiles and the arena of resource conversions
//! they expose, the [`inventory::Inventory`] seam through which conversions
//! take effect, and the priority scheduler that decides in which order
//! conversions are applied each turn.
//!
//! # Conversion Ordering
//!
//! Every conversion carries an integer priority; lower values apply first.
//! The scheduler collects conversions from all tiles in row-major order and
//! stable-sorts them by priority:
//!
//! ```rust,ignore
//! let ordered = scheduler::order_for_application(&world);
//! inventory.apply_conversions(&world.resolve(&ordered))?;
//! ```
//!
//! Players reorder costly conversions with [`scheduler::reorder_costly`],
//! which rotates priority values among the costly ordering and never touches
//! free conversions.
//!
//! # Key Types
//!
//! - [`world::World`] -- Tile grid plus the slot-map arena of conversions.
//! - [`conversion::Conversion`] -- A resource transformation rule with a priority.
//! - [`inventory::Inventory`] -- Trait for the resource store driven by the turn.
//! - [`inventory::Stockpile`] -- Reference inventory with labor and population.
//! - [`resource::ResourceRegistry`] -- Name lookup for resource ids.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic growth.

pub mod conversion;
pub mod fixed;
pub mod id;
pub mod inventory;
pub mod resource;
pub mod scheduler;
pub mod world;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
