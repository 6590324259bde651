//! Time-attack direction - difficulty ramp and streak scoring
//!
//! Produces puzzle configurations for continuous play, stepping the
//! difficulty up every three solves and paying streak-scaled scores. Unlike
//! the daily generator this path is intentionally non-deterministic; the
//! caller seeds it from entropy.

use tracing::debug;

use crate::core::config::PuzzleConfig;
use crate::core::ops::generate_non_palindrome;
use crate::core::rng::Mulberry32;
use crate::types::{symbols_of, Difficulty, EngineError, OpKind, Symbol};

/// Externally injected tuning constants for continuous play
#[derive(Debug, Clone, PartialEq)]
pub struct DirectorConfig {
    pub base_len: usize,
    pub max_len: usize,
    pub starting_moves: u32,
    pub min_moves: u32,
    /// Moves removed per difficulty step (fractional; floored when applied)
    pub ramp_rate: f64,
    pub base_score: f64,
    /// Extra fraction of base per streak step beyond the first
    pub streak_rate: f64,
    pub move_bonus: f64,
    pub time_bonus: f64,
    /// Countdown per generated puzzle, seconds
    pub time_limit: u32,
    /// Symbols drawn from a prefix of this pool; prefix grows with difficulty
    pub symbol_pool: Vec<Symbol>,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            base_len: 5,
            max_len: 11,
            starting_moves: 8,
            min_moves: 3,
            ramp_rate: 0.5,
            base_score: 100.0,
            streak_rate: 0.25,
            move_bonus: 10.0,
            time_bonus: 2.0,
            time_limit: 60,
            symbol_pool: symbols_of("ABCDE"),
        }
    }
}

/// Stateful puzzle director for time-attack play
#[derive(Debug, Clone)]
pub struct ProceduralDirector {
    config: DirectorConfig,
    rng: Mulberry32,
    puzzles_solved: u32,
    streak: u32,
    total_score: u64,
}

impl ProceduralDirector {
    pub fn new(config: DirectorConfig, rng: Mulberry32) -> Self {
        Self {
            config,
            rng,
            puzzles_solved: 0,
            streak: 0,
            total_score: 0,
        }
    }

    pub fn puzzles_solved(&self) -> u32 {
        self.puzzles_solved
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    /// Stepped ramp: one difficulty level per three solves
    pub fn difficulty(&self) -> u32 {
        self.puzzles_solved / 3
    }

    fn tier(&self) -> Difficulty {
        match self.difficulty() {
            0 => Difficulty::Easy,
            1 | 2 => Difficulty::Medium,
            3 | 4 => Difficulty::Hard,
            _ => Difficulty::Expert,
        }
    }

    /// Build the next puzzle at the current ramp position.
    pub fn generate_puzzle(&mut self) -> Result<PuzzleConfig, EngineError> {
        let d = self.difficulty();
        let length = self
            .config
            .max_len
            .min(self.config.base_len + (d as usize) / 2);
        let budget = self
            .config
            .min_moves
            .max(self.config.starting_moves.saturating_sub(
                (f64::from(d) * self.config.ramp_rate).floor() as u32,
            ));
        let pool_size = 5usize.min(3 + (d as usize) / 3);
        let pool = &self.config.symbol_pool[..pool_size.min(self.config.symbol_pool.len())];

        let sequence = generate_non_palindrome(&mut self.rng, pool, length)?;
        let level_id = format!("time-attack-{}", self.puzzles_solved + 1);
        debug!(
            level_id = %level_id,
            difficulty = d,
            length,
            budget,
            pool = pool_size,
            "time-attack puzzle generated"
        );

        Ok(PuzzleConfig {
            level_id,
            sequence,
            allowed_ops: OpKind::ALL.to_vec(),
            max_operations: budget,
            time_limit: Some(self.config.time_limit),
            category: "letters".to_string(),
            bonus_objectives: Vec::new(),
            difficulty: self.tier(),
            target_palindrome: None,
        })
    }

    /// Record a solved puzzle and return the score it earned.
    ///
    /// The streak steps first so the first solve scores at streak 1; the
    /// solve counter steps last so the difficulty factor reflects the
    /// puzzle that was just solved.
    pub fn record_solve(
        &mut self,
        time_remaining: u32,
        moves_used: u32,
        moves_available: u32,
    ) -> u32 {
        self.streak += 1;
        let c = &self.config;

        let streak_factor = 1.0 + f64::from(self.streak - 1) * c.streak_rate;
        let moves_left = f64::from(moves_available.saturating_sub(moves_used));
        let raw = c.base_score * streak_factor
            + moves_left * c.move_bonus
            + f64::from(time_remaining) * c.time_bonus;
        let score = (raw * (1.0 + f64::from(self.difficulty()) * 0.1)).round() as u32;

        self.total_score += u64::from(score);
        self.puzzles_solved += 1;
        debug!(
            score,
            streak = self.streak,
            solved = self.puzzles_solved,
            total = self.total_score,
            "solve recorded"
        );
        score
    }

    /// Break the streak after an unsolved, budget-exhausted puzzle. Solve
    /// count and total score are untouched.
    pub fn reset_streak(&mut self) {
        self.streak = 0;
    }
}
