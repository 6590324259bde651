//! Puzzle session - one puzzle attempt's state machine
//!
//! Owns the current sequence, operation budget, time budget, history and
//! scoring for a single attempt. Invalid requests are rejected with `false`
//! and zero side effects; normal gameplay never errors.
//!
//! The session never owns a clock. An external once-per-unit caller drives
//! `tick`, and expiry is reported exactly once through the tick outcome.
//! Dropping the session is its destruction; there is no self-registered
//! callback to unregister.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::config::{PuzzleConfig, ScoringRules};
use crate::core::ops;
use crate::types::{Operation, Symbol, MAX_SEQUENCE_LEN};

/// Session phase. `Solved` and `Expired` are terminal; no transition
/// leaves a terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Active,
    Solved,
    Expired,
}

/// Outcome of a tick call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Time advanced; the session is still active
    Running,
    /// This tick exhausted the time budget. Reported exactly once.
    Expired,
    /// The session was already terminal; nothing changed
    Terminal,
}

/// One applied operation, as recorded in the history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub op: Operation,
    /// Symbol the edit touched: inserted, removed, or overwritten
    pub affected: Option<Symbol>,
    /// Session-elapsed seconds when the operation was applied
    pub at_seconds: u32,
}

/// Immutable snapshot of a finished (or in-progress) attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelResult {
    pub level_id: String,
    pub completed: bool,
    pub final_sequence: Vec<Symbol>,
    pub history: Vec<HistoryRecord>,
    pub elapsed_seconds: u32,
    pub ops_used: u32,
    pub undo_used: bool,
    pub score: u32,
    pub satisfied_bonuses: Vec<String>,
    pub is_palindrome: bool,
}

/// Stateful controller for one puzzle attempt
#[derive(Debug, Clone)]
pub struct PuzzleSession {
    config: PuzzleConfig,
    rules: ScoringRules,
    sequence: Vec<Symbol>,
    ops_remaining: u32,
    time_remaining: Option<u32>,
    elapsed_seconds: u32,
    history: Vec<HistoryRecord>,
    /// Pre-edit sequences, parallel to `history`, for undo
    undo_stack: Vec<Vec<Symbol>>,
    undo_used: bool,
    phase: Phase,
}

impl PuzzleSession {
    pub fn new(config: PuzzleConfig, rules: ScoringRules) -> Self {
        let sequence = config.sequence.clone();
        let ops_remaining = config.max_operations;
        let time_remaining = config.time_limit;
        debug!(
            level_id = %config.level_id,
            len = sequence.len(),
            ops = ops_remaining,
            timed = time_remaining.is_some(),
            "session started"
        );
        Self {
            config,
            rules,
            sequence,
            ops_remaining,
            time_remaining,
            elapsed_seconds: 0,
            history: Vec::new(),
            undo_stack: Vec::new(),
            undo_used: false,
            phase: Phase::Active,
        }
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn sequence(&self) -> &[Symbol] {
        &self.sequence
    }

    pub fn ops_remaining(&self) -> u32 {
        self.ops_remaining
    }

    pub fn time_remaining(&self) -> Option<u32> {
        self.time_remaining
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase != Phase::Active
    }

    pub fn undo_used(&self) -> bool {
        self.undo_used
    }

    fn ops_used(&self) -> u32 {
        self.config.max_operations - self.ops_remaining
    }

    /// Structural precondition for an operation against the current
    /// sequence. Distinct from the pure edits, which validate nothing.
    fn precondition_holds(&self, op: &Operation) -> bool {
        let len = self.sequence.len();
        match op {
            // Gameplay swaps are adjacent-only
            Operation::Swap { i, j } => *i < len && *j < len && i.abs_diff(*j) == 1,
            Operation::Rotate { start, end, .. } => len >= 3 && start < end && *end < len,
            Operation::Mirror { start, end } => start < end && *end < len,
            Operation::Insert { pos, .. } => len < MAX_SEQUENCE_LEN && *pos <= len,
            Operation::Delete { pos } => len > 1 && *pos < len,
            Operation::Replace { pos, .. } => *pos < len,
        }
    }

    fn affected_symbol(&self, op: &Operation) -> Option<Symbol> {
        match op {
            Operation::Insert { symbol, .. } => Some(symbol.clone()),
            Operation::Delete { pos } => Some(self.sequence[*pos].clone()),
            Operation::Replace { pos, .. } => Some(self.sequence[*pos].clone()),
            _ => None,
        }
    }

    /// Apply an operation to the current sequence.
    ///
    /// Returns `false` without side effects when the kind is not allowed,
    /// the session is terminal, the budget is exhausted, or the structural
    /// precondition fails.
    pub fn apply(&mut self, op: Operation) -> bool {
        if self.is_terminal() || self.ops_remaining == 0 {
            return false;
        }
        if !self.config.allows(op.kind()) {
            return false;
        }
        if !self.precondition_holds(&op) {
            return false;
        }

        let affected = self.affected_symbol(&op);
        self.undo_stack.push(self.sequence.clone());
        self.sequence = ops::apply(&self.sequence, &op);
        self.ops_remaining -= 1;
        self.history.push(HistoryRecord {
            op,
            affected,
            at_seconds: self.elapsed_seconds,
        });
        trace!(
            remaining = self.ops_remaining,
            len = self.sequence.len(),
            "operation applied"
        );
        true
    }

    /// Revert the most recent operation.
    ///
    /// Restores the pre-edit sequence and pops the history record but does
    /// NOT refund the operation budget, so the budget stays monotonically
    /// non-increasing. Sets a sticky flag consumed by the no-undo bonus.
    pub fn undo(&mut self) -> bool {
        if self.is_terminal() {
            return false;
        }
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        self.sequence = previous;
        self.history.pop();
        self.undo_used = true;
        true
    }

    /// Advance session time by `seconds`.
    ///
    /// With a time budget, counts it down; reaching zero makes the session
    /// terminal and reports `Expired` exactly once.
    pub fn tick(&mut self, seconds: u32) -> TickOutcome {
        if self.is_terminal() {
            return TickOutcome::Terminal;
        }
        self.elapsed_seconds += seconds;

        if let Some(remaining) = self.time_remaining {
            let remaining = remaining.saturating_sub(seconds);
            self.time_remaining = Some(remaining);
            if remaining == 0 {
                self.phase = Phase::Expired;
                debug!(level_id = %self.config.level_id, "session expired");
                return TickOutcome::Expired;
            }
        }
        TickOutcome::Running
    }

    /// Check whether the current sequence completes the puzzle.
    ///
    /// True iff the sequence is a palindrome and, when an exact target is
    /// configured, equals it. Idempotent; the only path to `Solved`.
    pub fn check_completion(&mut self) -> bool {
        if self.phase == Phase::Solved {
            return true;
        }
        if self.phase == Phase::Expired {
            return false;
        }

        let done = ops::is_palindrome(&self.sequence)
            && self
                .config
                .target_palindrome
                .as_ref()
                .map_or(true, |target| *target == self.sequence);
        if done {
            self.phase = Phase::Solved;
            debug!(
                level_id = %self.config.level_id,
                ops_used = self.ops_used(),
                elapsed = self.elapsed_seconds,
                "session solved"
            );
        }
        done
    }

    /// Derive the result snapshot.
    ///
    /// Score: base completion (solved only) + unused-operation bonus +
    /// remaining-time bonus (timed only), scaled by the tier multiplier,
    /// plus the points of every satisfied bonus objective. Each predicate
    /// is evaluated exactly once, independently.
    pub fn result(&self) -> LevelResult {
        let completed = self.phase == Phase::Solved;

        let mut raw = 0.0;
        if completed {
            raw += f64::from(self.rules.base_completion);
        }
        raw += f64::from(self.ops_remaining * self.rules.per_operation_bonus);
        if let Some(remaining) = self.time_remaining {
            raw += f64::from(remaining * self.rules.per_second_bonus);
        }
        raw *= self.rules.multiplier(self.config.difficulty);

        let mut result = LevelResult {
            level_id: self.config.level_id.clone(),
            completed,
            final_sequence: self.sequence.clone(),
            history: self.history.clone(),
            elapsed_seconds: self.elapsed_seconds,
            ops_used: self.ops_used(),
            undo_used: self.undo_used,
            score: raw.round() as u32,
            satisfied_bonuses: Vec::new(),
            is_palindrome: ops::is_palindrome(&self.sequence),
        };

        let mut bonus_points = 0;
        for objective in &self.config.bonus_objectives {
            if objective.condition.evaluate(&result) {
                bonus_points += objective.points;
                result.satisfied_bonuses.push(objective.id.clone());
            }
        }
        result.score += bonus_points;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{BonusCondition, BonusObjective};
    use crate::types::{symbols_of, Difficulty, OpKind, RotateDir};

    fn config(sequence: &str) -> PuzzleConfig {
        PuzzleConfig {
            level_id: "test".to_string(),
            sequence: symbols_of(sequence),
            allowed_ops: OpKind::ALL.to_vec(),
            max_operations: 5,
            time_limit: None,
            category: "letters".to_string(),
            bonus_objectives: Vec::new(),
            difficulty: Difficulty::Easy,
            target_palindrome: None,
        }
    }

    fn session(sequence: &str) -> PuzzleSession {
        PuzzleSession::new(config(sequence), ScoringRules::default())
    }

    #[test]
    fn test_new_session_copies_config() {
        let s = session("AAB");
        assert_eq!(s.sequence(), symbols_of("AAB"));
        assert_eq!(s.ops_remaining(), 5);
        assert_eq!(s.time_remaining(), None);
        assert_eq!(s.phase(), Phase::Active);
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_apply_swap_adjacent() {
        let mut s = session("AAB");
        assert!(s.apply(Operation::Swap { i: 1, j: 2 }));
        assert_eq!(s.sequence(), symbols_of("ABA"));
        assert_eq!(s.ops_remaining(), 4);
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_apply_rejects_non_adjacent_swap() {
        let mut s = session("AAB");
        assert!(!s.apply(Operation::Swap { i: 0, j: 2 }));
        assert_eq!(s.sequence(), symbols_of("AAB"));
        assert_eq!(s.ops_remaining(), 5);
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_apply_rejects_out_of_bounds() {
        let mut s = session("AAB");
        assert!(!s.apply(Operation::Replace {
            pos: 3,
            symbol: "X".into()
        }));
        assert!(!s.apply(Operation::Swap { i: 2, j: 3 }));
        assert!(!s.apply(Operation::Mirror { start: 1, end: 3 }));
        assert_eq!(s.ops_remaining(), 5);
    }

    #[test]
    fn test_apply_rejects_disallowed_kind() {
        let mut cfg = config("AAB");
        cfg.allowed_ops = vec![OpKind::Swap];
        let mut s = PuzzleSession::new(cfg, ScoringRules::default());
        assert!(!s.apply(Operation::Delete { pos: 0 }));
        assert!(s.apply(Operation::Swap { i: 0, j: 1 }));
    }

    #[test]
    fn test_apply_rejects_when_budget_exhausted() {
        let mut cfg = config("ABCDEF");
        cfg.max_operations = 1;
        let mut s = PuzzleSession::new(cfg, ScoringRules::default());
        assert!(s.apply(Operation::Swap { i: 0, j: 1 }));
        let before = s.sequence().to_vec();
        assert!(!s.apply(Operation::Swap { i: 1, j: 2 }));
        assert_eq!(s.sequence(), before);
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.ops_remaining(), 0);
    }

    #[test]
    fn test_rotate_requires_length_three() {
        let mut s = session("AB");
        assert!(!s.apply(Operation::Rotate {
            start: 0,
            end: 1,
            dir: RotateDir::Left
        }));

        let mut s = session("ABC");
        assert!(s.apply(Operation::Rotate {
            start: 0,
            end: 2,
            dir: RotateDir::Left
        }));
        assert_eq!(s.sequence(), symbols_of("BCA"));
    }

    #[test]
    fn test_insert_respects_length_cap() {
        let mut s = session("ABCDEFGHIJKLMNO");
        assert_eq!(s.sequence().len(), MAX_SEQUENCE_LEN);
        assert!(!s.apply(Operation::Insert {
            pos: 0,
            symbol: "X".into()
        }));
    }

    #[test]
    fn test_delete_requires_length_above_one() {
        let mut cfg = config("AB");
        cfg.max_operations = 5;
        let mut s = PuzzleSession::new(cfg, ScoringRules::default());
        assert!(s.apply(Operation::Delete { pos: 0 }));
        assert!(!s.apply(Operation::Delete { pos: 0 }));
        assert_eq!(s.sequence().len(), 1);
    }

    #[test]
    fn test_history_records_affected_symbol() {
        let mut s = session("AAB");
        assert!(s.apply(Operation::Delete { pos: 2 }));
        assert_eq!(s.history()[0].affected, Some("B".into()));

        assert!(s.apply(Operation::Replace {
            pos: 0,
            symbol: "C".into()
        }));
        // Replace records the overwritten symbol
        assert_eq!(s.history()[1].affected, Some("A".into()));
    }

    #[test]
    fn test_completion_makes_terminal() {
        let mut s = session("AAB");
        assert!(!s.check_completion());
        assert!(s.apply(Operation::Swap { i: 1, j: 2 }));
        assert!(s.check_completion());
        assert_eq!(s.phase(), Phase::Solved);

        // Idempotent, and terminal state rejects further operations
        assert!(s.check_completion());
        assert!(!s.apply(Operation::Swap { i: 0, j: 1 }));
    }

    #[test]
    fn test_completion_with_exact_target() {
        let mut cfg = config("AAB");
        cfg.target_palindrome = Some(symbols_of("BAB"));
        let mut s = PuzzleSession::new(cfg, ScoringRules::default());

        // ABA is a palindrome but not the required target
        assert!(s.apply(Operation::Swap { i: 1, j: 2 }));
        assert!(!s.check_completion());
        assert_eq!(s.phase(), Phase::Active);

        assert!(s.apply(Operation::Swap { i: 0, j: 1 }));
        assert!(!s.check_completion()); // BAA
        assert!(s.apply(Operation::Swap { i: 1, j: 2 }));
        assert!(s.check_completion()); // BAB
    }

    #[test]
    fn test_tick_counts_down_and_expires_once() {
        let mut cfg = config("AAB");
        cfg.time_limit = Some(3);
        let mut s = PuzzleSession::new(cfg, ScoringRules::default());

        assert_eq!(s.tick(1), TickOutcome::Running);
        assert_eq!(s.time_remaining(), Some(2));
        assert_eq!(s.tick(1), TickOutcome::Running);
        assert_eq!(s.tick(1), TickOutcome::Expired);
        assert_eq!(s.phase(), Phase::Expired);

        // Expiry fires exactly once; later ticks are terminal no-ops
        assert_eq!(s.tick(1), TickOutcome::Terminal);
        assert_eq!(s.time_remaining(), Some(0));
        assert!(!s.apply(Operation::Swap { i: 0, j: 1 }));
        assert!(!s.check_completion());
    }

    #[test]
    fn test_tick_untimed_session_never_expires() {
        let mut s = session("AAB");
        for _ in 0..100 {
            assert_eq!(s.tick(1), TickOutcome::Running);
        }
        assert_eq!(s.elapsed_seconds(), 100);
        assert_eq!(s.phase(), Phase::Active);
    }

    #[test]
    fn test_undo_restores_sequence_without_refund() {
        let mut s = session("AAB");
        assert!(s.apply(Operation::Swap { i: 1, j: 2 }));
        assert_eq!(s.ops_remaining(), 4);

        assert!(s.undo());
        assert_eq!(s.sequence(), symbols_of("AAB"));
        assert!(s.history().is_empty());
        // Budget is not refunded
        assert_eq!(s.ops_remaining(), 4);
        assert!(s.undo_used());

        // Nothing left to undo
        assert!(!s.undo());
    }

    #[test]
    fn test_result_score_solved() {
        let mut cfg = config("AAB");
        cfg.max_operations = 3;
        cfg.time_limit = Some(60);
        let mut s = PuzzleSession::new(cfg, ScoringRules::default());
        s.tick(10);
        assert!(s.apply(Operation::Swap { i: 1, j: 2 }));
        assert!(s.check_completion());

        let result = s.result();
        assert!(result.completed);
        assert!(result.is_palindrome);
        assert_eq!(result.ops_used, 1);
        assert_eq!(result.elapsed_seconds, 10);
        // (100 base + 2 unused * 10 + 50s * 2) * 1.0 easy multiplier
        assert_eq!(result.score, 220);
    }

    #[test]
    fn test_result_score_unsolved_has_no_base() {
        let cfg = config("AAB");
        let s = PuzzleSession::new(cfg, ScoringRules::default());
        let result = s.result();
        assert!(!result.completed);
        // 5 unused * 10, no base, no time budget
        assert_eq!(result.score, 50);
    }

    #[test]
    fn test_result_difficulty_multiplier() {
        let mut cfg = config("AAB");
        cfg.difficulty = Difficulty::Hard;
        cfg.max_operations = 3;
        let mut s = PuzzleSession::new(cfg, ScoringRules::default());
        assert!(s.apply(Operation::Swap { i: 1, j: 2 }));
        assert!(s.check_completion());
        // (100 + 2 * 10) * 2.0
        assert_eq!(s.result().score, 240);
    }

    #[test]
    fn test_result_bonus_objectives() {
        let mut cfg = config("AAB");
        cfg.max_operations = 3;
        cfg.bonus_objectives = vec![
            BonusObjective {
                id: "fast".to_string(),
                points: 40,
                condition: BonusCondition::SolvedWithinSeconds { seconds: 5 },
            },
            BonusObjective {
                id: "efficient".to_string(),
                points: 30,
                condition: BonusCondition::OpsUsedAtMost { ops: 1 },
            },
            BonusObjective {
                id: "clean".to_string(),
                points: 20,
                condition: BonusCondition::NoUndo,
            },
        ];
        let mut s = PuzzleSession::new(cfg, ScoringRules::default());
        assert!(s.apply(Operation::Swap { i: 1, j: 2 }));
        assert!(s.check_completion());

        let result = s.result();
        assert_eq!(
            result.satisfied_bonuses,
            vec!["fast".to_string(), "efficient".to_string(), "clean".to_string()]
        );
        // (100 + 20) * 1.0 + 40 + 30 + 20
        assert_eq!(result.score, 210);
    }

    #[test]
    fn test_result_after_expiry() {
        let mut cfg = config("AAB");
        cfg.time_limit = Some(1);
        let mut s = PuzzleSession::new(cfg, ScoringRules::default());
        assert_eq!(s.tick(1), TickOutcome::Expired);

        let result = s.result();
        assert!(!result.completed);
        assert!(!result.is_palindrome);
        assert_eq!(result.elapsed_seconds, 1);
    }
}
