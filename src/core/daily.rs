//! Daily challenge generation - one shared global puzzle per day
//!
//! Builds a fully-specified `PuzzleConfig` from a canonical `YYYY-MM-DD`
//! date string. The date hashes to the PRNG seed and every parameter is
//! drawn from that seeded stream in a fixed order, so identical dates
//! produce byte-identical configurations on every machine. Reordering the
//! draws is a breaking change to the determinism contract.

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::debug;

use crate::core::config::{BonusCondition, BonusObjective, PuzzleConfig};
use crate::core::ops::generate_non_palindrome;
use crate::core::rng::{hash_date, Mulberry32};
use crate::types::{symbols_of, Difficulty, EngineError, OpKind, Symbol};

/// A named set of display symbols puzzles can draw from
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub symbols: Vec<Symbol>,
}

impl Category {
    pub fn new(name: &str, symbols: &str) -> Self {
        Self {
            name: name.to_string(),
            symbols: symbols_of(symbols),
        }
    }
}

/// Shipped symbol catalog. Every category carries at least 12 symbols so
/// any tier's pool-size bound can be satisfied.
pub fn builtin_catalog() -> Vec<Category> {
    vec![
        Category::new("letters", "ABCDEFGHIJKLMNOPQRSTUVWXYZ"),
        Category::new("greek", "αβγδεζηθικλμνξ"),
        Category::new("glyphs", "●○■□▲△◆◇★☆♥♡"),
    ]
}

/// Per-tier inclusive `[min, max]` bounds for generation
struct TierParams {
    len: (u32, u32),
    ops: (u32, u32),
    time: (u32, u32),
    pool: (u32, u32),
    allowed: &'static [OpKind],
}

const ALL_OPS: [OpKind; 6] = OpKind::ALL;
const BASIC_OPS: [OpKind; 2] = [OpKind::Swap, OpKind::Replace];
const EASY_OPS: [OpKind; 4] = [OpKind::Swap, OpKind::Rotate, OpKind::Mirror, OpKind::Replace];

/// Indexed by `Difficulty::index`. Hard pools stay within the first ten
/// symbols of a category.
const TIER_PARAMS: [TierParams; 5] = [
    TierParams { len: (4, 5), ops: (4, 5), time: (240, 300), pool: (3, 4), allowed: &BASIC_OPS },
    TierParams { len: (5, 6), ops: (5, 7), time: (120, 180), pool: (4, 5), allowed: &EASY_OPS },
    TierParams { len: (6, 8), ops: (6, 8), time: (90, 150), pool: (5, 7), allowed: &ALL_OPS },
    TierParams { len: (8, 10), ops: (7, 10), time: (60, 120), pool: (8, 10), allowed: &ALL_OPS },
    TierParams { len: (10, 12), ops: (9, 12), time: (45, 90), pool: (10, 12), allowed: &ALL_OPS },
];

/// Fixed difficulty-by-weekday lookup; not randomized.
pub fn tier_for_weekday(weekday: Weekday) -> Difficulty {
    match weekday {
        Weekday::Sat | Weekday::Sun => Difficulty::Easy,
        Weekday::Tue | Weekday::Wed => Difficulty::Hard,
        Weekday::Mon | Weekday::Thu | Weekday::Fri => Difficulty::Medium,
    }
}

/// Deterministic daily puzzle generator
#[derive(Debug, Clone)]
pub struct DailyGenerator {
    catalog: Vec<Category>,
}

impl DailyGenerator {
    pub fn new(catalog: Vec<Category>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &[Category] {
        &self.catalog
    }

    /// Build the puzzle for a canonical `YYYY-MM-DD` date string.
    ///
    /// Errors on a non-canonical date or when a catalog category violates
    /// the generation contract.
    pub fn generate(&self, date: &str) -> Result<PuzzleConfig, EngineError> {
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| EngineError::InvalidDate(date.to_string()))?;
        // Reject non-canonical spellings such as "2024-1-2"; they would
        // hash to a different seed than the canonical form.
        if parsed.format("%Y-%m-%d").to_string() != date {
            return Err(EngineError::InvalidDate(date.to_string()));
        }

        debug_assert!(!self.catalog.is_empty(), "catalog must not be empty");
        let difficulty = tier_for_weekday(parsed.weekday());
        let params = &TIER_PARAMS[difficulty.index()];
        let mut rng = Mulberry32::new(hash_date(date));

        // Draw order is part of the determinism contract.
        let length = rng.next_range(params.len.0, params.len.1) as usize;
        let max_operations = rng.next_range(params.ops.0, params.ops.1);
        let time_limit = rng.next_range(params.time.0, params.time.1);
        let pool_size = rng.next_range(params.pool.0, params.pool.1) as usize;
        let category_idx = rng.next_range(0, self.catalog.len() as u32 - 1) as usize;

        let category = &self.catalog[category_idx];
        let pool = &category.symbols[..pool_size.min(category.symbols.len())];
        let sequence = generate_non_palindrome(&mut rng, pool, length)?;

        let bonus_objectives = vec![
            BonusObjective {
                id: "daily-speed".to_string(),
                points: 50,
                condition: BonusCondition::SolvedWithinSeconds {
                    seconds: time_limit / 2,
                },
            },
            BonusObjective {
                id: "daily-efficiency".to_string(),
                points: 75,
                condition: BonusCondition::OpsUsedAtMost {
                    ops: (max_operations * 3 / 4).max(1),
                },
            },
            BonusObjective {
                id: "daily-no-undo".to_string(),
                points: 25,
                condition: BonusCondition::NoUndo,
            },
        ];

        debug!(
            date,
            difficulty = difficulty.as_str(),
            length,
            max_operations,
            time_limit,
            category = %category.name,
            "daily puzzle generated"
        );

        Ok(PuzzleConfig {
            level_id: format!("daily-{date}"),
            sequence,
            allowed_ops: params.allowed.to_vec(),
            max_operations,
            time_limit: Some(time_limit),
            category: category.name.clone(),
            bonus_objectives,
            difficulty,
            target_palindrome: None,
        })
    }
}

impl Default for DailyGenerator {
    fn default() -> Self {
        Self::new(builtin_catalog())
    }
}
