//! Palindrome puzzle engine.
//!
//! The playable mechanic: transform a symbol sequence into a palindrome
//! with a bounded set of edits, against operation and time budgets. This
//! crate is the engine only - the transformation algebra, palindrome
//! analysis, the per-attempt session state machine, and deterministic and
//! procedural puzzle generation. Rendering, input, audio and persistence
//! are external collaborators.
//!
//! Everything is single-threaded and reactive: sessions are driven by an
//! externally owned clock via [`core::PuzzleSession::tick`], and all
//! randomness flows through explicitly injected [`core::Mulberry32`]
//! generators so daily puzzles are reproducible everywhere.

pub mod core;
pub mod types;
