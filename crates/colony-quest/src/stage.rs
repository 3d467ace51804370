//! Quest stages and the catalog that links them into a progression graph.
//!
//! Stages are declared first and wired together afterwards, so transitions
//! may point forward to stages declared later. The first declared stage is
//! the entry (tutorial) stage.

use crate::condition::{QuestCondition, QuestContext};
use colony_tech_tree::{TechCatalog, TechId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifies a stage in a quest catalog. Assigned in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StageId(pub u32);

/// Closing text shown when a run ends on a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ending {
    pub title: String,
    pub description: String,
}

/// An edge of the quest graph, taken when `when` holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestTransition {
    pub when: QuestCondition,
    pub to: StageId,
}

/// A node of the quest graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestStage {
    pub id: StageId,

    /// Unique key used by data files.
    pub name: String,

    /// Current objective text.
    pub description: String,

    pub hint: Option<String>,

    pub is_win_state: bool,

    pub is_lose_state: bool,

    pub ending: Option<Ending>,

    /// Checked in order; the first that holds wins.
    pub transitions: Vec<QuestTransition>,
}

impl QuestStage {
    pub fn is_terminal(&self) -> bool {
        self.is_win_state || self.is_lose_state
    }

    /// The stage this one moves to given the current run state, or its own
    /// id if no transition fires.
    pub fn next_stage<C: QuestContext + ?Sized>(&self, ctx: &C) -> StageId {
        self.transitions
            .iter()
            .find(|t| t.when.evaluate(ctx))
            .map_or(self.id, |t| t.to)
    }
}

/// Declaration of a stage before it is added to a catalog.
#[derive(Debug, Clone)]
pub struct StageSpec {
    pub name: String,
    pub description: String,
    pub hint: Option<String>,
    pub is_win_state: bool,
    pub is_lose_state: bool,
    pub ending: Option<Ending>,
}

impl StageSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            hint: None,
            is_win_state: false,
            is_lose_state: false,
            ending: None,
        }
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn win(mut self) -> Self {
        self.is_win_state = true;
        self
    }

    pub fn lose(mut self) -> Self {
        self.is_lose_state = true;
        self
    }

    pub fn ending(mut self, title: impl Into<String>, description: impl Into<String>) -> Self {
        self.ending = Some(Ending {
            title: title.into(),
            description: description.into(),
        });
        self
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while building or validating a quest catalog.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuestCatalogError {
    #[error("quest catalog has no stages")]
    Empty,

    #[error("duplicate stage name: {0}")]
    DuplicateName(String),

    #[error("stage {0:?} does not exist")]
    UnknownStage(StageId),

    #[error("stage '{0}' is marked as both a win and a lose state")]
    AmbiguousTerminal(String),

    #[error("terminal stage '{0}' has outgoing transitions")]
    TerminalWithTransitions(String),

    #[error("stage '{stage}' refers to unknown technology {tech:?}")]
    UnknownTechnology { stage: String, tech: TechId },

    #[error("technology '{0}' is not in the tech catalog")]
    MissingTechnology(String),
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Builder for an immutable [`QuestCatalog`].
#[derive(Debug, Default)]
pub struct QuestCatalogBuilder {
    stages: Vec<QuestStage>,
    name_to_id: HashMap<String, StageId>,
}

impl QuestCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a stage. The first declared stage is the entry stage.
    pub fn declare(&mut self, spec: StageSpec) -> Result<StageId, QuestCatalogError> {
        if self.name_to_id.contains_key(&spec.name) {
            return Err(QuestCatalogError::DuplicateName(spec.name));
        }
        if spec.is_win_state && spec.is_lose_state {
            return Err(QuestCatalogError::AmbiguousTerminal(spec.name));
        }
        let id = StageId(self.stages.len() as u32);
        self.name_to_id.insert(spec.name.clone(), id);
        self.stages.push(QuestStage {
            id,
            name: spec.name,
            description: spec.description,
            hint: spec.hint,
            is_win_state: spec.is_win_state,
            is_lose_state: spec.is_lose_state,
            ending: spec.ending,
            transitions: Vec::new(),
        });
        Ok(id)
    }

    /// Add a transition from `from` to `to`, guarded by `when`. Terminal
    /// stages are fixed points and accept no transitions.
    pub fn transition(
        &mut self,
        from: StageId,
        when: QuestCondition,
        to: StageId,
    ) -> Result<(), QuestCatalogError> {
        if to.0 as usize >= self.stages.len() {
            return Err(QuestCatalogError::UnknownStage(to));
        }
        let stage = self
            .stages
            .get_mut(from.0 as usize)
            .ok_or(QuestCatalogError::UnknownStage(from))?;
        if stage.is_terminal() {
            return Err(QuestCatalogError::TerminalWithTransitions(stage.name.clone()));
        }
        stage.transitions.push(QuestTransition { when, to });
        Ok(())
    }

    pub fn id(&self, name: &str) -> Option<StageId> {
        self.name_to_id.get(name).copied()
    }

    pub fn build(self) -> Result<QuestCatalog, QuestCatalogError> {
        if self.stages.is_empty() {
            return Err(QuestCatalogError::Empty);
        }
        Ok(QuestCatalog {
            stages: self.stages,
            name_to_id: self.name_to_id,
        })
    }
}

/// The quest graph. Frozen after build; the entry stage is `StageId(0)`.
#[derive(Debug, Clone)]
pub struct QuestCatalog {
    stages: Vec<QuestStage>,
    name_to_id: HashMap<String, StageId>,
}

impl QuestCatalog {
    /// The standard progression: unpack the lander, research engineering,
    /// grow the colony. The colony is lost if its population dies out.
    pub fn standard(techs: &TechCatalog) -> Result<Self, QuestCatalogError> {
        let mut b = QuestCatalogBuilder::new();

        let unpack = b.declare(
            StageSpec::new("unpack_lander", "Unpack the lander to establish the colony.")
                .hint("Select the lander tile and choose Unpack."),
        )?;
        let research = b.declare(
            StageSpec::new("first_research", "Research your first engineering technology.")
                .hint("Open the research screen to see what is available."),
        )?;
        let grow = b.declare(StageSpec::new(
            "grow_colony",
            "Grow the colony to 20 colonists.",
        ))?;
        let won = b.declare(
            StageSpec::new("colony_thriving", "The colony is thriving.")
                .win()
                .ending(
                    "A New Home",
                    "Against the odds, the colony has taken root on this world.",
                ),
        )?;
        let lost = b.declare(
            StageSpec::new("colony_perished", "The colony has perished.")
                .lose()
                .ending("Silence", "No one remains to tend the colony."),
        )?;

        let engineering = techs
            .id("Engineering01")
            .ok_or_else(|| QuestCatalogError::MissingTechnology("Engineering01".to_string()))?;
        let perished = QuestCondition::Population {
            op: crate::condition::ComparisonOp::Eq,
            value: 0,
        };

        b.transition(unpack, QuestCondition::tile_exists("habitat"), research)?;
        b.transition(research, perished.clone(), lost)?;
        b.transition(research, QuestCondition::TechUnlocked(engineering), grow)?;
        b.transition(grow, perished, lost)?;
        b.transition(grow, QuestCondition::population_at_least(20), won)?;

        b.build()
    }

    /// The tutorial stage every run starts in.
    pub fn entry(&self) -> StageId {
        StageId(0)
    }

    pub fn get(&self, id: StageId) -> Option<&QuestStage> {
        self.stages.get(id.0 as usize)
    }

    pub fn id(&self, name: &str) -> Option<StageId> {
        self.name_to_id.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestStage> {
        self.stages.iter()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Check that every technology referenced by a transition exists.
    pub fn validate_against(&self, techs: &TechCatalog) -> Result<(), QuestCatalogError> {
        for stage in &self.stages {
            let mut referenced = Vec::new();
            for transition in &stage.transitions {
                transition.when.referenced_techs(&mut referenced);
            }
            if let Some(tech) = referenced.into_iter().find(|t| techs.get(*t).is_none()) {
                return Err(QuestCatalogError::UnknownTechnology {
                    stage: stage.name.clone(),
                    tech,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::tests::Snapshot;

    #[test]
    fn first_declared_stage_is_entry() {
        let mut b = QuestCatalogBuilder::new();
        let first = b.declare(StageSpec::new("a", "A")).unwrap();
        b.declare(StageSpec::new("b", "B")).unwrap();
        let catalog = b.build().unwrap();
        assert_eq!(catalog.entry(), first);
        assert_eq!(catalog.get(first).unwrap().description, "A");
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert_eq!(
            QuestCatalogBuilder::new().build().unwrap_err(),
            QuestCatalogError::Empty
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut b = QuestCatalogBuilder::new();
        b.declare(StageSpec::new("a", "A")).unwrap();
        assert_eq!(
            b.declare(StageSpec::new("a", "again")).unwrap_err(),
            QuestCatalogError::DuplicateName("a".to_string())
        );
    }

    #[test]
    fn win_and_lose_together_is_rejected() {
        let mut b = QuestCatalogBuilder::new();
        let err = b
            .declare(StageSpec::new("both", "?").win().lose())
            .unwrap_err();
        assert_eq!(err, QuestCatalogError::AmbiguousTerminal("both".to_string()));
    }

    #[test]
    fn terminal_stages_accept_no_transitions() {
        let mut b = QuestCatalogBuilder::new();
        let start = b.declare(StageSpec::new("start", "go")).unwrap();
        let end = b.declare(StageSpec::new("end", "done").win()).unwrap();
        assert_eq!(
            b.transition(end, QuestCondition::Always, start),
            Err(QuestCatalogError::TerminalWithTransitions("end".to_string()))
        );
    }

    #[test]
    fn transition_to_unknown_stage_is_rejected() {
        let mut b = QuestCatalogBuilder::new();
        let start = b.declare(StageSpec::new("start", "go")).unwrap();
        assert_eq!(
            b.transition(start, QuestCondition::Always, StageId(7)),
            Err(QuestCatalogError::UnknownStage(StageId(7)))
        );
    }

    #[test]
    fn next_stage_takes_first_matching_transition() {
        let mut b = QuestCatalogBuilder::new();
        let start = b.declare(StageSpec::new("start", "go")).unwrap();
        let left = b.declare(StageSpec::new("left", "L")).unwrap();
        let right = b.declare(StageSpec::new("right", "R")).unwrap();
        b.transition(start, QuestCondition::population_at_least(5), left)
            .unwrap();
        b.transition(start, QuestCondition::Always, right).unwrap();
        let catalog = b.build().unwrap();
        let stage = catalog.get(start).unwrap();

        let small = Snapshot {
            population: 1,
            ..Default::default()
        };
        let large = Snapshot {
            population: 9,
            ..Default::default()
        };
        assert_eq!(stage.next_stage(&small), right);
        assert_eq!(stage.next_stage(&large), left);
    }

    #[test]
    fn stage_without_firing_transition_maps_to_itself() {
        let mut b = QuestCatalogBuilder::new();
        let start = b.declare(StageSpec::new("start", "go")).unwrap();
        let next = b.declare(StageSpec::new("next", "n")).unwrap();
        b.transition(start, QuestCondition::population_at_least(5), next)
            .unwrap();
        let catalog = b.build().unwrap();
        let snap = Snapshot::default();
        assert_eq!(catalog.get(start).unwrap().next_stage(&snap), start);
        assert_eq!(catalog.get(next).unwrap().next_stage(&snap), next);
    }

    #[test]
    fn standard_catalog_is_well_formed() {
        let techs = TechCatalog::standard();
        let catalog = QuestCatalog::standard(&techs).unwrap();
        assert_eq!(catalog.get(catalog.entry()).unwrap().name, "unpack_lander");
        assert!(catalog.validate_against(&techs).is_ok());
        let won = catalog.id("colony_thriving").unwrap();
        let won = catalog.get(won).unwrap();
        assert!(won.is_win_state && won.transitions.is_empty());
        assert_eq!(won.ending.as_ref().unwrap().title, "A New Home");
    }

    #[test]
    fn standard_catalog_needs_engineering_tech() {
        let empty = TechCatalog::default();
        assert_eq!(
            QuestCatalog::standard(&empty).unwrap_err(),
            QuestCatalogError::MissingTechnology("Engineering01".to_string())
        );
    }

    #[test]
    fn validation_reports_unknown_technology() {
        let mut b = QuestCatalogBuilder::new();
        let start = b.declare(StageSpec::new("start", "go")).unwrap();
        let next = b.declare(StageSpec::new("next", "n")).unwrap();
        b.transition(start, QuestCondition::TechUnlocked(TechId(42)), next)
            .unwrap();
        let catalog = b.build().unwrap();
        assert_eq!(
            catalog.validate_against(&TechCatalog::standard()),
            Err(QuestCatalogError::UnknownTechnology {
                stage: "start".to_string(),
                tech: TechId(42),
            })
        );
    }
}
