//! Conditions guarding quest transitions, evaluated against a read-only
//! snapshot of the run.

use colony_core::id::ResourceId;
use colony_tech_tree::TechId;
use serde::{Deserialize, Serialize};

/// Comparison operator for conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOp {
    Gt,
    Lt,
    Eq,
    Gte,
    Lte,
    Ne,
}

impl ComparisonOp {
    pub fn evaluate(self, left: i64, right: i64) -> bool {
        match self {
            ComparisonOp::Gt => left > right,
            ComparisonOp::Lt => left < right,
            ComparisonOp::Eq => left == right,
            ComparisonOp::Gte => left >= right,
            ComparisonOp::Lte => left <= right,
            ComparisonOp::Ne => left != right,
        }
    }
}

/// The parts of a run that quest conditions can observe.
pub trait QuestContext {
    /// Current turn number (the first turn is 1).
    fn turn(&self) -> u32;

    fn has_unlocked(&self, tech: TechId) -> bool;

    fn resource_quantity(&self, resource: ResourceId) -> u32;

    fn population(&self) -> u32;

    /// Number of world tiles of the given kind.
    fn tile_count(&self, kind: &str) -> usize;
}

/// A predicate over a [`QuestContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestCondition {
    Always,
    Turn { op: ComparisonOp, value: i64 },
    Population { op: ComparisonOp, value: i64 },
    Resource {
        resource: ResourceId,
        op: ComparisonOp,
        value: i64,
    },
    TileCount {
        kind: String,
        op: ComparisonOp,
        value: i64,
    },
    TechUnlocked(TechId),
    All(Vec<QuestCondition>),
    Any(Vec<QuestCondition>),
    Not(Box<QuestCondition>),
}

impl QuestCondition {
    /// At least one tile of `kind` exists.
    pub fn tile_exists(kind: impl Into<String>) -> Self {
        QuestCondition::TileCount {
            kind: kind.into(),
            op: ComparisonOp::Gte,
            value: 1,
        }
    }

    pub fn population_at_least(value: u32) -> Self {
        QuestCondition::Population {
            op: ComparisonOp::Gte,
            value: value as i64,
        }
    }

    pub fn evaluate<C: QuestContext + ?Sized>(&self, ctx: &C) -> bool {
        match self {
            QuestCondition::Always => true,
            QuestCondition::Turn { op, value } => op.evaluate(ctx.turn() as i64, *value),
            QuestCondition::Population { op, value } => {
                op.evaluate(ctx.population() as i64, *value)
            }
            QuestCondition::Resource {
                resource,
                op,
                value,
            } => op.evaluate(ctx.resource_quantity(*resource) as i64, *value),
            QuestCondition::TileCount { kind, op, value } => {
                op.evaluate(ctx.tile_count(kind) as i64, *value)
            }
            QuestCondition::TechUnlocked(tech) => ctx.has_unlocked(*tech),
            QuestCondition::All(conditions) => conditions.iter().all(|c| c.evaluate(ctx)),
            QuestCondition::Any(conditions) => conditions.iter().any(|c| c.evaluate(ctx)),
            QuestCondition::Not(inner) => !inner.evaluate(ctx),
        }
    }

    /// Technologies this condition refers to, for catalog validation.
    pub(crate) fn referenced_techs(&self, out: &mut Vec<TechId>) {
        match self {
            QuestCondition::TechUnlocked(tech) => out.push(*tech),
            QuestCondition::All(conditions) | QuestCondition::Any(conditions) => {
                for c in conditions {
                    c.referenced_techs(out);
                }
            }
            QuestCondition::Not(inner) => inner.referenced_techs(out),
            _ => {}
        }
    }
}
