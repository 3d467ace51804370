//! Resource type registry.
//!
//! Resources are registered by name at startup and addressed by
//! [`ResourceId`] afterwards. Ids are dense and assigned in registration
//! order.

use crate::id::ResourceId;
use std::collections::HashMap;

/// A resource quantity, used for conversion inputs and outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResourceAmount {
    pub resource: ResourceId,
    pub quantity: u32,
}

impl ResourceAmount {
    pub fn new(resource: ResourceId, quantity: u32) -> Self {
        Self { resource, quantity }
    }
}

/// Name <-> id lookup for resource types.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    names: Vec<String>,
    name_to_id: HashMap<String, ResourceId>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource type. Registering an existing name returns the
    /// id it already has.
    pub fn register(&mut self, name: &str) -> ResourceId {
        if let Some(id) = self.name_to_id.get(name) {
            return *id;
        }
        let id = ResourceId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.name_to_id.insert(name.to_string(), id);
        id
    }

    /// Lookup resource id by name.
    pub fn id(&self, name: &str) -> Option<ResourceId> {
        self.name_to_id.get(name).copied()
    }

    /// Lookup resource name by id.
    pub fn name(&self, id: ResourceId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All registered resources in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (ResourceId(i as u32), name.as_str()))
    }
}
