//! Colony Game -- one run of the colony sim, advanced a turn at a time.
//!
//! This crate ties the world and inventory from `colony-core` to the tech
//! tree and the quest graph, and exposes the operations the UI drives:
//! completing a turn, reordering costly conversions, unlocking technologies
//! and reading the quest state.
//!
//! # Key Types
//!
//! - [`Game`] -- the run state and the five-step turn pipeline.
//! - [`GameConfig`] -- starting parameters for a run.
//! - [`GameEvent`] -- buffered notifications for the UI.
//! - [`Outcome`] -- ongoing, won or lost.

pub mod config;
pub mod error;
pub mod event;
pub mod game;

pub use config::{GameConfig, LANDER_TILE};
pub use error::GameError;
pub use event::{GameEvent, Outcome, TurnSummary};
pub use game::{Game, RunView};
