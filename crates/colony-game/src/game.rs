//! The run state and the turn pipeline.
//!
//! # Architecture
//!
//! A [`Game`] owns everything that belongs to one run:
//! - the [`World`] (tiles and their conversions)
//! - an [`Inventory`] (resources, labor, population)
//! - a [`TechTracker`] and a [`QuestTracker`] over shared, immutable catalogs
//! - the turn counter and a buffer of [`GameEvent`]s for the UI
//!
//! # Turn Pipeline
//!
//! Each [`Game::complete_turn`] runs, in this order:
//! 1. **Produce** -- apply all conversions in priority order
//! 2. **Release** -- return assigned workers to the labor pool
//! 3. **Grow** -- population growth, seeing this turn's production
//! 4. **Advance** -- increment the turn counter
//! 5. **Quests** -- re-evaluate the quest stage against the new state

use crate::config::{GameConfig, LANDER_TILE};
use crate::error::GameError;
use crate::event::{GameEvent, Outcome, TurnSummary};
use colony_core::id::{ConversionId, ResourceId};
use colony_core::inventory::{Inventory, Stockpile};
use colony_core::scheduler::{self, Partition};
use colony_core::world::World;
use colony_quest::{Ending, QuestCatalog, QuestContext, QuestTracker, StageChange};
use colony_tech_tree::{TechCatalog, TechId, TechTracker, Technology};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// One run of the game.
#[derive(Debug)]
pub struct Game<I: Inventory = Stockpile> {
    world: World,
    inventory: I,
    quests: QuestTracker,
    techs: TechTracker,
    turn: u32,
    events: Vec<GameEvent>,
}

impl Game<Stockpile> {
    /// Start a new run from a configuration.
    pub fn new(
        config: &GameConfig,
        techs: Arc<TechCatalog>,
        quests: Arc<QuestCatalog>,
    ) -> Result<Self, GameError> {
        let mut world = World::new(config.width, config.height, &config.terrain);
        if let Some((x, y)) = config.lander {
            world.set_tile_kind(x, y, LANDER_TILE)?;
        }

        let mut stockpile = Stockpile::new(config.population, config.growth_rate)
            .with_workers(config.workers.unwrap_or(config.population));
        if let Some(food) = config.food {
            stockpile = stockpile.with_food(food);
        }
        for (resource, quantity) in &config.starting_resources {
            stockpile.add(*resource, *quantity)?;
        }

        tracing::info!(
            target: "colony::game",
            width = config.width,
            height = config.height,
            population = config.population,
            "run.started"
        );
        Ok(Self::from_parts(world, stockpile, techs, quests, config.first_turn))
    }
}

impl<I: Inventory> Game<I> {
    /// Assemble a run from already-built parts. The quest tracker starts at
    /// the catalog's entry stage.
    pub fn from_parts(
        world: World,
        inventory: I,
        techs: Arc<TechCatalog>,
        quests: Arc<QuestCatalog>,
        first_turn: u32,
    ) -> Self {
        Self {
            world,
            inventory,
            quests: QuestTracker::new(quests),
            techs: TechTracker::new(techs),
            turn: first_turn,
            events: Vec::new(),
        }
    }

    // -- Accessors --

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut I {
        &mut self.inventory
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Read-only snapshot used to evaluate quest conditions.
    pub fn view(&self) -> RunView<'_, I> {
        RunView {
            world: &self.world,
            inventory: &self.inventory,
            techs: &self.techs,
            turn: self.turn,
        }
    }

    // -- Conversions --

    /// Free and costly conversions, each in application order.
    pub fn resource_conversions(&self) -> Partition {
        scheduler::partition(&self.world)
    }

    /// Every conversion in the order it is applied this turn.
    pub fn all_resource_conversions(&self) -> Vec<ConversionId> {
        scheduler::order_for_application(&self.world)
    }

    /// Move a costly conversion to another place in the priority order.
    /// Invalid indices are ignored.
    pub fn shift_costly_conversion_priority(&mut self, from: usize, to: usize) {
        scheduler::reorder_costly(&mut self.world, from, to);
    }

    // -- Quests --

    pub fn current_quest_description(&self) -> &str {
        self.quests.description()
    }

    pub fn current_quest_hint(&self) -> Option<&str> {
        self.quests.hint()
    }

    pub fn previous_quest_description(&self) -> &str {
        self.quests.previous_description()
    }

    pub fn quest_completion_shown(&self) -> bool {
        self.quests.completion_shown()
    }

    pub fn set_quest_completion_shown(&mut self, shown: bool) {
        self.quests.set_completion_shown(shown);
    }

    pub fn quests(&self) -> &QuestTracker {
        &self.quests
    }

    pub fn has_won(&self) -> bool {
        self.quests.has_won()
    }

    pub fn has_lost(&self) -> bool {
        self.quests.has_lost()
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::from_flags(self.has_won(), self.has_lost())
    }

    /// Ending text, once the run is over.
    pub fn ending(&self) -> Option<&Ending> {
        if self.outcome() == Outcome::Ongoing {
            return None;
        }
        self.quests.ending()
    }

    /// Re-evaluate the quest stage against the current run state.
    pub fn update_quest_state(&mut self) -> Option<StageChange> {
        let view = RunView {
            world: &self.world,
            inventory: &self.inventory,
            techs: &self.techs,
            turn: self.turn,
        };
        let change = self.quests.update(&view);

        if let Some(change) = change {
            self.events.push(GameEvent::QuestAdvanced {
                from: change.from,
                to: change.to,
                turn: self.turn,
            });
            if self.quests.has_won() {
                tracing::info!(target: "colony::game", turn = self.turn, "run.won");
                self.events.push(GameEvent::RunWon { turn: self.turn });
            }
            if self.quests.has_lost() {
                tracing::info!(target: "colony::game", turn = self.turn, "run.lost");
                self.events.push(GameEvent::RunLost { turn: self.turn });
            }
        }
        change
    }

    // -- Technologies --

    pub fn has_unlocked_technology(&self, tech: TechId) -> bool {
        self.techs.has_unlocked(tech)
    }

    /// Mark a technology as researched. Unlocking twice is a no-op.
    pub fn unlock_technology(&mut self, tech: TechId) {
        if self.techs.unlock(tech, self.turn) {
            tracing::info!(
                target: "colony::game",
                tech = tech.0,
                turn = self.turn,
                "tech.unlocked"
            );
            self.events.push(GameEvent::TechnologyUnlocked {
                tech,
                turn: self.turn,
            });
        }
    }

    pub fn unlocked_technologies(&self) -> &[TechId] {
        self.techs.unlocked()
    }

    pub fn research_options(&self) -> Vec<&Technology> {
        self.techs.research_options()
    }

    pub fn techs(&self) -> &TechTracker {
        &self.techs
    }

    // -- Turn pipeline --

    /// End the current turn.
    ///
    /// An inventory error aborts the turn where it happened; effects applied
    /// before the error are kept and the turn counter is not advanced. A run
    /// already at `u32::MAX` fails with [`GameError::TurnLimit`] before
    /// anything is applied.
    pub fn complete_turn(&mut self) -> Result<TurnSummary, GameError> {
        let next_turn = self
            .turn
            .checked_add(1)
            .ok_or(GameError::TurnLimit { turn: self.turn })?;

        // 1. Produce.
        let ordered = scheduler::order_for_application(&self.world);
        let conversions = self.world.resolve(&ordered);
        self.inventory.apply_conversions(&conversions)?;
        let applied = conversions.len();

        // 2. Release labor. 3. Grow.
        self.inventory.release_workers();
        self.inventory.do_population_growth();

        // 4. Advance.
        self.turn = next_turn;

        // 5. Quests.
        let stage_change = self.update_quest_state();

        tracing::debug!(
            target: "colony::game",
            turn = self.turn,
            conversions = applied,
            population = self.inventory.population(),
            "turn.completed"
        );
        self.events.push(GameEvent::TurnCompleted { turn: self.turn });

        Ok(TurnSummary {
            turn: self.turn,
            conversions: applied,
            stage_change,
        })
    }

    // -- Event API --

    /// Drain all pending events. Returns events and clears the internal list.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get a read-only view of pending events.
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }
}

// ---------------------------------------------------------------------------
// RunView
// ---------------------------------------------------------------------------

/// Borrowed view of a run, as seen by quest conditions.
#[derive(Debug)]
pub struct RunView<'a, I: Inventory> {
    world: &'a World,
    inventory: &'a I,
    techs: &'a TechTracker,
    turn: u32,
}

impl<I: Inventory> QuestContext for RunView<'_, I> {
    fn turn(&self) -> u32 {
        self.turn
    }

    fn has_unlocked(&self, tech: TechId) -> bool {
        self.techs.has_unlocked(tech)
    }

    fn resource_quantity(&self, resource: ResourceId) -> u32 {
        self.inventory.quantity(resource)
    }

    fn population(&self) -> u32 {
        self.inventory.population()
    }

    fn tile_count(&self, kind: &str) -> usize {
        self.world.tile_count(kind)
    }
}
