//! Core module - pure puzzle engine logic
//!
//! Contains the sequence algebra, the session state machine and the two
//! puzzle generators. Zero dependencies on UI, audio, or persistence; those
//! collaborators consume this module's outputs and feed it configuration.

pub mod config;
pub mod daily;
pub mod director;
pub mod ops;
pub mod rng;
pub mod session;

// Re-export commonly used types
pub use config::{BonusCondition, BonusObjective, PuzzleConfig, ScoringRules};
pub use daily::{builtin_catalog, Category, DailyGenerator};
pub use director::{DirectorConfig, ProceduralDirector};
pub use ops::Hint;
pub use rng::{hash_date, Mulberry32};
pub use session::{HistoryRecord, LevelResult, Phase, PuzzleSession, TickOutcome};
