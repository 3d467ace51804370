//! Events and results reported by the turn pipeline.
//!
//! Events are buffered on the [`Game`](crate::Game) as they happen and
//! handed to the UI in batch through [`Game::drain_events`](crate::Game::drain_events).

use colony_quest::{StageChange, StageId};
use colony_tech_tree::TechId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// A run event. All events carry the turn at which they occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    // -- Turns --
    TurnCompleted {
        turn: u32,
    },

    // -- Progression --
    QuestAdvanced {
        from: StageId,
        to: StageId,
        turn: u32,
    },
    TechnologyUnlocked {
        tech: TechId,
        turn: u32,
    },

    // -- End of run --
    RunWon {
        turn: u32,
    },
    RunLost {
        turn: u32,
    },
}

impl GameEvent {
    pub fn turn(&self) -> u32 {
        match *self {
            GameEvent::TurnCompleted { turn }
            | GameEvent::QuestAdvanced { turn, .. }
            | GameEvent::TechnologyUnlocked { turn, .. }
            | GameEvent::RunWon { turn }
            | GameEvent::RunLost { turn } => turn,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Where a run stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Ongoing,
    Won,
    Lost,
}

impl Outcome {
    /// Winning takes precedence if both flags are somehow set.
    pub fn from_flags(has_won: bool, has_lost: bool) -> Self {
        match (has_won, has_lost) {
            (true, _) => Outcome::Won,
            (false, true) => Outcome::Lost,
            (false, false) => Outcome::Ongoing,
        }
    }

    pub fn is_over(self) -> bool {
        self != Outcome::Ongoing
    }

    /// Banner shown on the end-of-run screen.
    pub fn header(self) -> Option<&'static str> {
        match self {
            Outcome::Ongoing => None,
            Outcome::Won => Some("YOU WIN!"),
            Outcome::Lost => Some("GAME OVER!"),
        }
    }
}

// ---------------------------------------------------------------------------
// Turn summary
// ---------------------------------------------------------------------------

/// What [`Game::complete_turn`](crate::Game::complete_turn) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnSummary {
    /// Turn number after the increment.
    pub turn: u32,

    /// Conversions handed to the inventory.
    pub conversions: usize,

    pub stage_change: Option<StageChange>,
}
