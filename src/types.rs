//! Core types shared across the engine
//! This module contains pure data types with no gameplay logic

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum sequence length while inserts are allowed
pub const MAX_SEQUENCE_LEN: usize = 15;

/// Resample attempts before the non-palindrome fallback kicks in
pub const NON_PALINDROME_ATTEMPTS: usize = 100;

/// An opaque display token. Sequences are ordered lists of symbols,
/// duplicates allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Self(c.to_string())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build a sequence from a string, one symbol per character.
/// Convenience for tests and builtin symbol categories.
pub fn symbols_of(s: &str) -> Vec<Symbol> {
    s.chars().map(Symbol::from).collect()
}

/// Direction for the rotate edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotateDir {
    Left,
    Right,
}

/// A sequence edit. Each variant is a pure sequence -> sequence transform;
/// positions are indices into the current sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Swap { i: usize, j: usize },
    Rotate { start: usize, end: usize, dir: RotateDir },
    Mirror { start: usize, end: usize },
    Insert { pos: usize, symbol: Symbol },
    Delete { pos: usize },
    Replace { pos: usize, symbol: Symbol },
}

impl Operation {
    pub fn kind(&self) -> OpKind {
        match self {
            Operation::Swap { .. } => OpKind::Swap,
            Operation::Rotate { .. } => OpKind::Rotate,
            Operation::Mirror { .. } => OpKind::Mirror,
            Operation::Insert { .. } => OpKind::Insert,
            Operation::Delete { .. } => OpKind::Delete,
            Operation::Replace { .. } => OpKind::Replace,
        }
    }
}

/// Operation kinds, used for the per-puzzle allowed-operation set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Swap,
    Rotate,
    Mirror,
    Insert,
    Delete,
    Replace,
}

impl OpKind {
    pub const ALL: [OpKind; 6] = [
        OpKind::Swap,
        OpKind::Rotate,
        OpKind::Mirror,
        OpKind::Insert,
        OpKind::Delete,
        OpKind::Replace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Swap => "swap",
            OpKind::Rotate => "rotate",
            OpKind::Mirror => "mirror",
            OpKind::Insert => "insert",
            OpKind::Delete => "delete",
            OpKind::Replace => "replace",
        }
    }

    /// Parse kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "swap" => Some(OpKind::Swap),
            "rotate" => Some(OpKind::Rotate),
            "mirror" => Some(OpKind::Mirror),
            "insert" => Some(OpKind::Insert),
            "delete" => Some(OpKind::Delete),
            "replace" => Some(OpKind::Replace),
            _ => None,
        }
    }
}

/// Difficulty tier, selects parameter ranges for generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Tutorial,
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn index(&self) -> usize {
        match self {
            Difficulty::Tutorial => 0,
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
            Difficulty::Expert => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Tutorial => "tutorial",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

/// Hard-failure conditions. Normal gameplay never produces these; they
/// signal a configuration bug upstream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("symbol pool must contain at least two distinct symbols")]
    DegeneratePool,
    #[error("requested sequence length must be at least 2, got {0}")]
    SequenceTooShort(usize),
    #[error("invalid canonical date string: {0}")]
    InvalidDate(String),
}
