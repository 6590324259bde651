//! Puzzle configuration and scoring rules
//!
//! `PuzzleConfig` is produced once by a generator (or a static level table)
//! and never mutated. Scoring constants live in `ScoringRules` and are
//! injected by the caller, so balance tuning never touches session logic.

use serde::{Deserialize, Serialize};

use crate::core::session::LevelResult;
use crate::types::{Difficulty, OpKind, Symbol};

/// A fully-specified puzzle attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    pub level_id: String,
    /// Starting sequence
    pub sequence: Vec<Symbol>,
    /// Operation kinds the session will accept
    pub allowed_ops: Vec<OpKind>,
    /// Operation budget
    pub max_operations: u32,
    /// Time budget in seconds, if the puzzle is timed
    pub time_limit: Option<u32>,
    /// Display category the symbols were drawn from
    pub category: String,
    pub bonus_objectives: Vec<BonusObjective>,
    pub difficulty: Difficulty,
    /// When set, completion requires equality with this exact palindrome,
    /// not just palindromicity.
    pub target_palindrome: Option<Vec<Symbol>>,
}

impl PuzzleConfig {
    pub fn allows(&self, kind: OpKind) -> bool {
        self.allowed_ops.contains(&kind)
    }
}

/// An optional scoring objective, evaluated once against a finished attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusObjective {
    pub id: String,
    pub points: u32,
    pub condition: BonusCondition,
}

/// Bonus predicates as data. Each is pure over a `LevelResult` and captures
/// nothing but the generator's own output parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BonusCondition {
    /// Solved with elapsed time at or under the threshold
    SolvedWithinSeconds { seconds: u32 },
    /// Solved using at most this many operations
    OpsUsedAtMost { ops: u32 },
    /// Solved without ever using undo
    NoUndo,
}

impl BonusCondition {
    pub fn evaluate(&self, result: &LevelResult) -> bool {
        if !result.completed {
            return false;
        }
        match self {
            BonusCondition::SolvedWithinSeconds { seconds } => {
                result.elapsed_seconds <= *seconds
            }
            BonusCondition::OpsUsedAtMost { ops } => result.ops_used <= *ops,
            BonusCondition::NoUndo => !result.undo_used,
        }
    }
}

/// Externally injected scoring constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Awarded only when the puzzle is solved
    pub base_completion: u32,
    /// Per unused operation
    pub per_operation_bonus: u32,
    /// Per remaining second, timed puzzles only
    pub per_second_bonus: u32,
    /// Multiplier per difficulty tier, indexed by `Difficulty::index`
    pub tier_multipliers: [f64; 5],
}

impl ScoringRules {
    pub fn multiplier(&self, difficulty: Difficulty) -> f64 {
        self.tier_multipliers[difficulty.index()]
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base_completion: 100,
            per_operation_bonus: 10,
            per_second_bonus: 2,
            tier_multipliers: [0.5, 1.0, 1.5, 2.0, 3.0],
        }
    }
}
