//! Tech Tree for the colony game.
//!
//! Provides the technology catalog (sciences, costs, prerequisites) and the
//! per-run tracker of completed technologies.
//!
//! # Overview
//!
//! Technologies are registered once at startup through a
//! [`TechCatalogBuilder`]; the resulting [`TechCatalog`] is immutable and is
//! shared between runs behind an `Arc`. Registration rejects prerequisites
//! that are not registered yet, so the prerequisite graph is acyclic by
//! construction.
//!
//! Each run owns a [`TechTracker`], which records unlocked technologies and
//! answers which ones can be researched next:
//!
//! ```rust,ignore
//! let catalog = Arc::new(TechCatalog::standard());
//! let mut tracker = TechTracker::new(catalog);
//! let options = tracker.research_options();
//! tracker.unlock(options[0].id, 1);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifies a technology in the catalog. Assigned in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TechId(pub u32);

// ---------------------------------------------------------------------------
// Sciences and costs
// ---------------------------------------------------------------------------

/// Branches of research. Research costs are paid in science of a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Science {
    Starting,
    Xenotechnology,
    Engineering,
    Social,
}

impl Science {
    pub fn name(self) -> &'static str {
        match self {
            Science::Starting => "Starting",
            Science::Xenotechnology => "Xenotechnology",
            Science::Engineering => "Engineering",
            Science::Social => "Social",
        }
    }
}

/// An amount of one science.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScienceCost {
    pub science: Science,
    pub quantity: u32,
}

impl ScienceCost {
    /// The cost of technologies available from the start.
    pub const FREE: ScienceCost = ScienceCost {
        science: Science::Starting,
        quantity: 0,
    };

    pub fn new(science: Science, quantity: u32) -> Self {
        Self { science, quantity }
    }
}

impl fmt::Display for ScienceCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.science.name(), self.quantity)
    }
}

// ---------------------------------------------------------------------------
// Technology definition
// ---------------------------------------------------------------------------

/// A technology that can be researched. Immutable after registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    /// Unique identifier.
    pub id: TechId,

    /// Human-readable name.
    pub name: String,

    /// Technologies that must be completed before this one is offered.
    pub prerequisites: Vec<TechId>,

    /// Research cost, one entry per science involved.
    pub costs: Vec<ScienceCost>,

    /// Hidden technologies are never offered as research options.
    pub visible: bool,
}

/// A technology declaration prior to registration.
#[derive(Debug, Clone)]
pub struct TechSpec {
    pub name: String,
    pub prerequisites: Vec<TechId>,
    pub costs: Vec<ScienceCost>,
    pub visible: bool,
}

impl TechSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prerequisites: Vec::new(),
            costs: vec![ScienceCost::FREE],
            visible: true,
        }
    }

    pub fn requires(mut self, prerequisite: TechId) -> Self {
        self.prerequisites.push(prerequisite);
        self
    }

    pub fn costs(mut self, costs: Vec<ScienceCost>) -> Self {
        self.costs = costs;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while building a technology catalog.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TechCatalogError {
    #[error("duplicate technology name: {0}")]
    DuplicateName(String),

    #[error("prerequisite {prereq:?} for technology '{tech}' does not exist")]
    InvalidPrerequisite { tech: String, prereq: TechId },
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Builder for an immutable [`TechCatalog`].
#[derive(Debug, Default)]
pub struct TechCatalogBuilder {
    technologies: Vec<Technology>,
    name_to_id: HashMap<String, TechId>,
}

impl TechCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a technology. Prerequisites must already be registered.
    pub fn register(&mut self, spec: TechSpec) -> Result<TechId, TechCatalogError> {
        if self.name_to_id.contains_key(&spec.name) {
            return Err(TechCatalogError::DuplicateName(spec.name));
        }

        let id = TechId(self.technologies.len() as u32);
        for prereq in &spec.prerequisites {
            if prereq.0 >= id.0 {
                return Err(TechCatalogError::InvalidPrerequisite {
                    tech: spec.name.clone(),
                    prereq: *prereq,
                });
            }
        }

        self.name_to_id.insert(spec.name.clone(), id);
        self.technologies.push(Technology {
            id,
            name: spec.name,
            prerequisites: spec.prerequisites,
            costs: spec.costs,
            visible: spec.visible,
        });
        Ok(id)
    }

    /// Lookup a registered technology id by name.
    pub fn id(&self, name: &str) -> Option<TechId> {
        self.name_to_id.get(name).copied()
    }

    pub fn build(self) -> TechCatalog {
        TechCatalog {
            technologies: self.technologies,
            name_to_id: self.name_to_id,
        }
    }
}

/// The full, ordered list of technologies. Frozen after build.
#[derive(Debug, Clone, Default)]
pub struct TechCatalog {
    technologies: Vec<Technology>,
    name_to_id: HashMap<String, TechId>,
}

impl TechCatalog {
    /// The starting engineering tree: one free root and three engineering
    /// technologies below it.
    pub fn standard() -> Self {
        let mut builder = TechCatalogBuilder::new();
        let engineering = |n| vec![ScienceCost::new(Science::Engineering, n)];
        let mut declare = |spec: TechSpec| {
            builder
                .register(spec)
                .expect("builtin tech tree is declared in dependency order")
        };
        let root = declare(TechSpec::new("Engineering0"));
        let first = declare(TechSpec::new("Engineering01").requires(root).costs(engineering(1)));
        declare(TechSpec::new("Engineering02").requires(root).costs(engineering(1)));
        declare(TechSpec::new("Engineering03").requires(first).costs(engineering(1)));
        builder.build()
    }

    pub fn get(&self, id: TechId) -> Option<&Technology> {
        self.technologies.get(id.0 as usize)
    }

    pub fn id(&self, name: &str) -> Option<TechId> {
        self.name_to_id.get(name).copied()
    }

    /// Technologies in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Technology> {
        self.technologies.iter()
    }

    pub fn len(&self) -> usize {
        self.technologies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.technologies.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tracker (runtime)
// ---------------------------------------------------------------------------

/// Completed technologies for one run. Grows monotonically.
#[derive(Debug, Clone)]
pub struct TechTracker {
    catalog: Arc<TechCatalog>,

    /// Turn on which each technology was unlocked.
    completed: HashMap<TechId, u32>,

    /// Unlock order.
    order: Vec<TechId>,
}

impl TechTracker {
    pub fn new(catalog: Arc<TechCatalog>) -> Self {
        Self {
            catalog,
            completed: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &TechCatalog {
        &self.catalog
    }

    pub fn has_unlocked(&self, id: TechId) -> bool {
        self.completed.contains_key(&id)
    }

    /// Record `id` as completed on `turn`. Returns `false` (and keeps the
    /// original turn) if it was already unlocked.
    pub fn unlock(&mut self, id: TechId, turn: u32) -> bool {
        if self.has_unlocked(id) {
            return false;
        }
        self.completed.insert(id, turn);
        self.order.push(id);
        true
    }

    /// Unlocked technologies in the order they were unlocked.
    pub fn unlocked(&self) -> &[TechId] {
        &self.order
    }

    pub fn unlocked_on(&self, id: TechId) -> Option<u32> {
        self.completed.get(&id).copied()
    }

    /// Technologies that are visible, have every prerequisite completed and
    /// are not completed themselves, in catalog order.
    pub fn research_options(&self) -> Vec<&Technology> {
        self.catalog
            .iter()
            .filter(|tech| tech.visible)
            .filter(|tech| tech.prerequisites.iter().all(|p| self.has_unlocked(*p)))
            .filter(|tech| !self.has_unlocked(tech.id))
            .collect()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
