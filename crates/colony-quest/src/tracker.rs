//! The quest state machine for one run.

use crate::condition::QuestContext;
use crate::stage::{Ending, QuestCatalog, QuestStage, StageId};
use std::sync::Arc;

/// A stage change made by [`QuestTracker::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageChange {
    pub from: StageId,
    pub to: StageId,
}

/// Tracks the current quest stage and the terminal flags derived from it.
#[derive(Debug, Clone)]
pub struct QuestTracker {
    catalog: Arc<QuestCatalog>,
    current: StageId,
    previous_description: String,

    /// Cleared whenever a new objective appears; the UI sets it again once
    /// the player has acknowledged the change.
    completion_shown: bool,

    has_won: bool,
    has_lost: bool,
}

impl QuestTracker {
    /// Start at the catalog's entry stage.
    pub fn new(catalog: Arc<QuestCatalog>) -> Self {
        let current = catalog.entry();
        Self {
            catalog,
            current,
            previous_description: String::new(),
            completion_shown: true,
            has_won: false,
            has_lost: false,
        }
    }

    pub fn catalog(&self) -> &QuestCatalog {
        &self.catalog
    }

    pub fn current_stage(&self) -> StageId {
        self.current
    }

    fn stage(&self) -> Option<&QuestStage> {
        self.catalog.get(self.current)
    }

    /// Current objective text.
    pub fn description(&self) -> &str {
        self.stage().map_or("", |s| s.description.as_str())
    }

    pub fn hint(&self) -> Option<&str> {
        self.stage().and_then(|s| s.hint.as_deref())
    }

    /// Objective text of the stage left by the most recent transition.
    pub fn previous_description(&self) -> &str {
        &self.previous_description
    }

    pub fn completion_shown(&self) -> bool {
        self.completion_shown
    }

    pub fn set_completion_shown(&mut self, shown: bool) {
        self.completion_shown = shown;
    }

    pub fn has_won(&self) -> bool {
        self.has_won
    }

    pub fn has_lost(&self) -> bool {
        self.has_lost
    }

    /// Ending text of the current stage, if it has one.
    pub fn ending(&self) -> Option<&Ending> {
        self.stage().and_then(|s| s.ending.as_ref())
    }

    /// Evaluate the current stage's transitions against `ctx` and advance if
    /// one fires. The win/lose flags are recomputed on every call.
    pub fn update<C: QuestContext + ?Sized>(&mut self, ctx: &C) -> Option<StageChange> {
        let next = self
            .stage()
            .map_or(self.current, |stage| stage.next_stage(ctx));

        let mut change = None;
        if next != self.current {
            let from = self.current;
            self.previous_description = self.description().to_string();
            self.completion_shown = false;
            self.current = next;
            change = Some(StageChange { from, to: next });
            tracing::info!(
                target: "colony::quest",
                from = from.0,
                to = next.0,
                description = %self.description(),
                "quest.advanced"
            );
        }

        let (won, lost) = self
            .stage()
            .map_or((false, false), |s| (s.is_win_state, s.is_lose_state));
        self.has_won = won;
        self.has_lost = lost;

        change
    }
}
