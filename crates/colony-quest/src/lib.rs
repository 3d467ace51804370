//! Quest progression for the colony game.
//!
//! A run moves through a graph of [`QuestStage`]s. Each stage carries the
//! current objective text and a list of guarded transitions; the guards are
//! plain data ([`QuestCondition`]) evaluated against a [`QuestContext`]
//! snapshot, so every transition can be tested without building a run.
//!
//! [`QuestTracker`] is the per-run state machine: it advances at most one
//! stage per [`QuestTracker::update`] call and derives the win/lose flags
//! from whichever stage is current.

pub mod condition;
pub mod stage;
pub mod tracker;

pub use condition::{ComparisonOp, QuestCondition, QuestContext};
pub use stage::{
    Ending, QuestCatalog, QuestCatalogBuilder, QuestCatalogError, QuestStage, QuestTransition,
    StageId, StageSpec,
};
pub use tracker::{QuestTracker, StageChange};
