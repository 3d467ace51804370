//! Resource conversions: rules that turn input resources into outputs when
//! applied during a turn.
//!
//! A conversion with no resource inputs is *free* and always applies (subject
//! to labor); the rest are *costly* and are gated by what the inventory can
//! afford at the moment the conversion is reached in the turn order.

use crate::id::ResourceId;
use crate::resource::ResourceAmount;
use serde::{Deserialize, Serialize};

/// A resource transformation rule owned by a tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    /// Human-readable name shown in the priority list.
    pub name: String,

    /// Resources consumed per application.
    pub inputs: Vec<ResourceAmount>,

    /// Resources produced per application.
    pub outputs: Vec<ResourceAmount>,

    /// Workers occupied by one application until they are released.
    pub workers: u32,

    /// Ordering key within a turn. Lower values apply earlier.
    /// Assigned by the world when the conversion is added.
    pub priority: i32,
}

impl Conversion {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            workers: 0,
            priority: 0,
        }
    }

    pub fn with_input(mut self, resource: ResourceId, quantity: u32) -> Self {
        self.inputs.push(ResourceAmount::new(resource, quantity));
        self
    }

    pub fn with_output(mut self, resource: ResourceId, quantity: u32) -> Self {
        self.outputs.push(ResourceAmount::new(resource, quantity));
        self
    }

    pub fn with_workers(mut self, workers: u32) -> Self {
        self.workers = workers;
        self
    }

    /// A conversion is free when activating it costs no resources.
    pub fn is_free(&self) -> bool {
        self.inputs.iter().all(|input| input.quantity == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_without_inputs_is_free() {
        let solar = Conversion::new("solar").with_output(ResourceId(0), 2);
        assert!(solar.is_free());
    }

    #[test]
    fn conversion_with_inputs_is_costly() {
        let smelter = Conversion::new("smelter")
            .with_input(ResourceId(0), 1)
            .with_output(ResourceId(1), 1);
        assert!(!smelter.is_free());
    }

    #[test]
    fn zero_quantity_inputs_cost_nothing() {
        let odd = Conversion::new("odd").with_input(ResourceId(0), 0);
        assert!(odd.is_free());
    }

    #[test]
    fn workers_do_not_make_a_conversion_costly() {
        let farm = Conversion::new("farm")
            .with_output(ResourceId(2), 3)
            .with_workers(1);
        assert!(farm.is_free());
        assert_eq!(farm.workers, 1);
    }
}
