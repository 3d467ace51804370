//! The inventory seam: the resource store that the turn pipeline drives.
//!
//! The turn pipeline only decides *which* conversions run and in *what*
//! order. Everything about how a single conversion changes the stockpile
//! (affordability, labor, overflow) lives behind the [`Inventory`] trait.
//! [`Stockpile`] is the reference implementation used by the game and tests.

use crate::conversion::Conversion;
use crate::fixed::{Fixed64, whole_units};
use crate::id::ResourceId;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while applying a turn's conversions. Any of these is fatal
/// for the turn; nothing is rolled back.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("quantity of {resource:?} would overflow (have {have}, adding {adding})")]
    Overflow {
        resource: ResourceId,
        have: u32,
        adding: u32,
    },

    #[error("quantity of {resource:?} would underflow (have {have}, removing {removing})")]
    Underflow {
        resource: ResourceId,
        have: u32,
        removing: u32,
    },

    #[error("conversion '{0}' could not be applied: {1}")]
    Rejected(String, String),
}

// ---------------------------------------------------------------------------
// Inventory trait
// ---------------------------------------------------------------------------

/// A resource store that the turn pipeline drives once per turn.
///
/// Calls happen in a fixed order each turn: `apply_conversions`, then
/// `release_workers`, then `do_population_growth`. Each call completes
/// synchronously.
pub trait Inventory: std::fmt::Debug {
    /// Apply conversions in the given order. The inventory decides, per
    /// conversion, whether it can be afforded.
    fn apply_conversions(&mut self, ordered: &[&Conversion]) -> Result<(), InventoryError>;

    /// Return every worker assigned this turn to the available pool.
    fn release_workers(&mut self);

    /// Grow (or shrink) the population for the turn.
    fn do_population_growth(&mut self);

    /// Current quantity of a resource.
    fn quantity(&self, resource: ResourceId) -> u32;

    /// Current colony population.
    fn population(&self) -> u32;
}

// ---------------------------------------------------------------------------
// Stockpile -- reference inventory
// ---------------------------------------------------------------------------

/// A colony-wide resource pool with labor tracking and population growth.
///
/// Conversions are applied greedily in the order given: a conversion runs if
/// its inputs and workers are available at that moment, otherwise it is
/// skipped for the turn. New colonists join the labor pool.
#[derive(Debug, Clone)]
pub struct Stockpile {
    resources: BTreeMap<ResourceId, u32>,

    population: u32,

    /// Workers free to staff conversions this turn.
    available_workers: u32,

    /// Workers occupied by conversions applied this turn.
    assigned_workers: u32,

    /// Fraction of the population added per turn.
    growth_rate: Fixed64,

    /// Fractional colonists carried over between turns.
    growth_progress: Fixed64,

    /// When set, each new colonist consumes one unit of this resource.
    food: Option<ResourceId>,

    /// Number of conversions actually applied during the last call.
    last_applied: usize,
}

impl Stockpile {
    /// A stockpile with `population` colonists, all of whom can work.
    pub fn new(population: u32, growth_rate: Fixed64) -> Self {
        Self {
            resources: BTreeMap::new(),
            population,
            available_workers: population,
            assigned_workers: 0,
            growth_rate,
            growth_progress: Fixed64::ZERO,
            food: None,
            last_applied: 0,
        }
    }

    /// Require one unit of `food` per colonist born.
    pub fn with_food(mut self, food: ResourceId) -> Self {
        self.food = Some(food);
        self
    }

    /// Override the initial labor pool (defaults to the whole population).
    pub fn with_workers(mut self, workers: u32) -> Self {
        self.available_workers = workers;
        self
    }

    pub fn with_resource(mut self, resource: ResourceId, quantity: u32) -> Self {
        self.resources.insert(resource, quantity);
        self
    }

    pub fn available_workers(&self) -> u32 {
        self.available_workers
    }

    pub fn assigned_workers(&self) -> u32 {
        self.assigned_workers
    }

    pub fn last_applied(&self) -> usize {
        self.last_applied
    }

    /// All non-zero resource quantities in id order.
    pub fn resources(&self) -> impl Iterator<Item = (ResourceId, u32)> + '_ {
        self.resources
            .iter()
            .filter(|(_, q)| **q > 0)
            .map(|(r, q)| (*r, *q))
    }

    pub fn add(&mut self, resource: ResourceId, quantity: u32) -> Result<(), InventoryError> {
        let have = self.quantity(resource);
        let total = have.checked_add(quantity).ok_or(InventoryError::Overflow {
            resource,
            have,
            adding: quantity,
        })?;
        self.resources.insert(resource, total);
        Ok(())
    }

    pub fn remove(&mut self, resource: ResourceId, quantity: u32) -> Result<(), InventoryError> {
        let have = self.quantity(resource);
        let rest = have.checked_sub(quantity).ok_or(InventoryError::Underflow {
            resource,
            have,
            removing: quantity,
        })?;
        self.resources.insert(resource, rest);
        Ok(())
    }

    /// Inputs and labor for `conversion` are on hand right now.
    pub fn can_afford(&self, conversion: &Conversion) -> bool {
        if conversion.workers > self.available_workers {
            return false;
        }
        // Sum per resource so a conversion listing the same input twice is
        // judged on the total.
        let mut needed: BTreeMap<ResourceId, u64> = BTreeMap::new();
        for input in &conversion.inputs {
            *needed.entry(input.resource).or_default() += input.quantity as u64;
        }
        needed
            .iter()
            .all(|(resource, qty)| self.quantity(*resource) as u64 >= *qty)
    }

    fn apply_one(&mut self, conversion: &Conversion) -> Result<(), InventoryError> {
        for input in &conversion.inputs {
            self.remove(input.resource, input.quantity)?;
        }
        for output in &conversion.outputs {
            self.add(output.resource, output.quantity)?;
        }
        self.available_workers -= conversion.workers;
        self.assigned_workers += conversion.workers;
        Ok(())
    }
}

impl Inventory for Stockpile {
    fn apply_conversions(&mut self, ordered: &[&Conversion]) -> Result<(), InventoryError> {
        self.last_applied = 0;
        for conversion in ordered {
            if !self.can_afford(conversion) {
                tracing::trace!(
                    target: "colony::inventory",
                    conversion = %conversion.name,
                    "conversion.skipped"
                );
                continue;
            }
            self.apply_one(conversion)?;
            self.last_applied += 1;
        }
        Ok(())
    }

    fn release_workers(&mut self) {
        self.available_workers += self.assigned_workers;
        self.assigned_workers = 0;
    }

    fn do_population_growth(&mut self) {
        // Populations past the fixed-point range grow as if at its maximum.
        let growth = Fixed64::saturating_from_num(self.population).saturating_mul(self.growth_rate);
        self.growth_progress = self.growth_progress.saturating_add(growth);

        let mut births = whole_units(self.growth_progress);
        if let Some(food) = self.food {
            births = births.min(self.quantity(food));
            if births > 0 {
                // births <= quantity, so removal cannot underflow.
                let left = self.quantity(food) - births;
                self.resources.insert(food, left);
            }
        }
        // Colonists not born this turn, for lack of food, are not carried over.
        self.growth_progress = self.growth_progress.frac();
        if births == 0 {
            return;
        }

        self.population = self.population.saturating_add(births);
        self.available_workers = self.available_workers.saturating_add(births);
    }

    fn quantity(&self, resource: ResourceId) -> u32 {
        self.resources.get(&resource).copied().unwrap_or(0)
    }

    fn population(&self) -> u32 {
        self.population
    }
}
