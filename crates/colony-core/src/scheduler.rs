//! Priority scheduling of conversions.
//!
//! Every turn the scheduler recomputes, from the world's current tiles, the
//! order in which conversions are handed to the inventory. Nothing is cached
//! between calls: tiles can gain or lose conversions between turns.
//!
//! # Ordering
//!
//! - Collection walks tiles row-major and each tile's conversions in the
//!   order they were added.
//! - All sorts are stable, so conversions sharing a priority keep their
//!   collection order.
//! - The application order is one global ascending-priority sort; free and
//!   costly conversions interleave by priority value. The free/costly split
//!   exists for the UI, which only lets players reorder costly conversions.

use crate::id::ConversionId;
use crate::world::World;

/// Conversions split by whether they cost resources, each half in
/// application order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub free: Vec<ConversionId>,
    pub costly: Vec<ConversionId>,
}

/// Every conversion exposed by every tile, in tile-traversal order.
pub fn collect_active_conversions(world: &World) -> Vec<ConversionId> {
    world
        .tiles()
        .iter()
        .flat_map(|tile| tile.conversions().iter().copied())
        .collect()
}

/// Split the active conversions into free and costly, each stable-sorted by
/// ascending priority.
pub fn partition(world: &World) -> Partition {
    let (mut free, mut costly): (Vec<_>, Vec<_>) = collect_active_conversions(world)
        .into_iter()
        .partition(|id| world.conversion(*id).is_some_and(|c| c.is_free()));
    sort_by_priority(world, &mut free);
    sort_by_priority(world, &mut costly);
    Partition { free, costly }
}

/// All active conversions in the order they are applied this turn.
pub fn order_for_application(world: &World) -> Vec<ConversionId> {
    let mut all = collect_active_conversions(world);
    sort_by_priority(world, &mut all);
    all
}

/// Move the costly conversion at `from` to position `to` of the current
/// costly ordering.
///
/// Priority values are rotated among the affected slots rather than
/// renumbered: the value at `from` ends up on the conversion at `to`, and
/// every conversion in between takes its neighbour's value, one step toward
/// `from`. Conversions outside the range, and all free conversions, keep
/// their priorities.
///
/// Out-of-range indices and `from == to` are ignored.
pub fn reorder_costly(world: &mut World, from: usize, to: usize) {
    let costly = partition(world).costly;
    if from == to || from >= costly.len() || to >= costly.len() {
        tracing::debug!(
            target: "colony::scheduler",
            from,
            to,
            costly = costly.len(),
            "reorder.ignored"
        );
        return;
    }

    let mut priorities: Vec<i32> = costly
        .iter()
        .map(|id| world.conversion(*id).map_or(0, |c| c.priority))
        .collect();

    if from < to {
        priorities[from..=to].rotate_left(1);
    } else {
        priorities[to..=from].rotate_right(1);
    }

    let (lo, hi) = (from.min(to), from.max(to));
    for (id, priority) in costly[lo..=hi].iter().zip(&priorities[lo..=hi]) {
        if let Some(conversion) = world.conversion_mut(*id) {
            conversion.priority = *priority;
        }
    }
}

fn sort_by_priority(world: &World, ids: &mut [ConversionId]) {
    // slice::sort_by_key is stable.
    ids.sort_by_key(|id| world.conversion(*id).map_or(i32::MAX, |c| c.priority));
}
