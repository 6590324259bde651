//! Sequence operations - the pure transformation algebra
//!
//! Palindrome analysis (detection, minimum-edit DP, hint heuristics), the
//! six reversible/irreversible edits, and sequence generation. Everything
//! here is pure: edits return new sequences and perform no bounds
//! validation themselves; validation is the session's responsibility.

use crate::core::rng::Mulberry32;
use crate::types::{
    EngineError, Operation, RotateDir, Symbol, NON_PALINDROME_ATTEMPTS,
};

/// True for length 0 or 1; otherwise each symbol must equal its mirror.
pub fn is_palindrome(seq: &[Symbol]) -> bool {
    let n = seq.len();
    (0..n / 2).all(|i| seq[i] == seq[n - 1 - i])
}

/// Minimum number of single-symbol edits to make `seq` a palindrome.
///
/// Classic interval DP over substrings: `dp[i][j] = dp[i+1][j-1]` when the
/// ends match, else `1 + min(dp[i+1][j], dp[i][j-1])`. O(n^2) time and
/// space, reallocated per call; fine for the short sequences this game
/// uses. Returns 0 exactly when the sequence is already a palindrome.
pub fn min_ops_to_palindrome(seq: &[Symbol]) -> usize {
    let n = seq.len();
    if n <= 1 {
        return 0;
    }

    let mut dp = vec![vec![0usize; n]; n];
    for gap in 1..n {
        for i in 0..n - gap {
            let j = i + gap;
            dp[i][j] = if seq[i] == seq[j] {
                // gap == 1 reads the zeroed lower triangle, which is correct
                dp[i + 1][j - 1]
            } else {
                1 + dp[i + 1][j].min(dp[i][j - 1])
            };
        }
    }
    dp[0][n - 1]
}

/// A suggested next move. Heuristic, not guaranteed optimal or minimal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hint {
    /// Swap the symbols at the two positions
    Swap { i: usize, j: usize },
    /// Replace the symbol at `pos` with `symbol`
    Replace { pos: usize, symbol: Symbol },
}

/// Produce one hint per mismatched mirror pair.
///
/// Greedily checks whether swapping one side's neighbour fixes the
/// mismatch; otherwise suggests replacing the right side with its mirror
/// symbol.
pub fn hints(seq: &[Symbol]) -> Vec<Hint> {
    let n = seq.len();
    let mut out = Vec::new();

    for i in 0..n / 2 {
        let j = n - 1 - i;
        if seq[i] == seq[j] {
            continue;
        }
        if i + 1 < j && seq[i + 1] == seq[j] {
            out.push(Hint::Swap { i, j: i + 1 });
        } else if j > i + 1 && seq[j - 1] == seq[i] {
            out.push(Hint::Swap { i: j - 1, j });
        } else {
            out.push(Hint::Replace {
                pos: j,
                symbol: seq[i].clone(),
            });
        }
    }
    out
}

/// Swap the symbols at `i` and `j`. Self-inverse.
pub fn apply_swap(seq: &[Symbol], i: usize, j: usize) -> Vec<Symbol> {
    let mut out = seq.to_vec();
    out.swap(i, j);
    out
}

/// Circular shift by one element within `[start, end]`.
pub fn apply_rotate(seq: &[Symbol], start: usize, end: usize, dir: RotateDir) -> Vec<Symbol> {
    let mut out = seq.to_vec();
    match dir {
        RotateDir::Left => out[start..=end].rotate_left(1),
        RotateDir::Right => out[start..=end].rotate_right(1),
    }
    out
}

/// Reverse the subrange `[start, end]`. Self-inverse.
pub fn apply_mirror(seq: &[Symbol], start: usize, end: usize) -> Vec<Symbol> {
    let mut out = seq.to_vec();
    out[start..=end].reverse();
    out
}

/// Insert `symbol` at `pos`, shifting the tail right.
pub fn apply_insert(seq: &[Symbol], pos: usize, symbol: Symbol) -> Vec<Symbol> {
    let mut out = seq.to_vec();
    out.insert(pos, symbol);
    out
}

/// Remove the symbol at `pos`.
pub fn apply_delete(seq: &[Symbol], pos: usize) -> Vec<Symbol> {
    let mut out = seq.to_vec();
    out.remove(pos);
    out
}

/// Replace the symbol at `pos` with `symbol`.
pub fn apply_replace(seq: &[Symbol], pos: usize, symbol: Symbol) -> Vec<Symbol> {
    let mut out = seq.to_vec();
    out[pos] = symbol;
    out
}

/// Exhaustive dispatch over the closed operation set.
pub fn apply(seq: &[Symbol], op: &Operation) -> Vec<Symbol> {
    match op {
        Operation::Swap { i, j } => apply_swap(seq, *i, *j),
        Operation::Rotate { start, end, dir } => apply_rotate(seq, *start, *end, *dir),
        Operation::Mirror { start, end } => apply_mirror(seq, *start, *end),
        Operation::Insert { pos, symbol } => apply_insert(seq, *pos, symbol.clone()),
        Operation::Delete { pos } => apply_delete(seq, *pos),
        Operation::Replace { pos, symbol } => apply_replace(seq, *pos, symbol.clone()),
    }
}

/// Draw a sequence of `length` symbols from `pool` that is guaranteed not
/// to be a palindrome.
///
/// Rejection-samples up to 100 attempts; if every draw happens to be a
/// palindrome, deterministically replaces the first symbol with a pool
/// symbol different from it. Always terminates.
///
/// Errors when the pool has fewer than two distinct symbols or `length`
/// is below two; both are caller contract violations.
pub fn generate_non_palindrome(
    rng: &mut Mulberry32,
    pool: &[Symbol],
    length: usize,
) -> Result<Vec<Symbol>, EngineError> {
    if length < 2 {
        return Err(EngineError::SequenceTooShort(length));
    }
    if pool.len() < 2 || pool.iter().all(|s| *s == pool[0]) {
        return Err(EngineError::DegeneratePool);
    }

    let mut candidate = Vec::new();
    for _ in 0..NON_PALINDROME_ATTEMPTS {
        candidate = (0..length).map(|_| rng.choice(pool).clone()).collect();
        if !is_palindrome(&candidate) {
            return Ok(candidate);
        }
    }

    // Fallback: a palindrome's first and last symbols match, so replacing
    // the first with anything different breaks the mirror.
    let replacement = pool
        .iter()
        .find(|s| **s != candidate[0])
        .cloned()
        .expect("pool has two distinct symbols");
    candidate[0] = replacement;
    Ok(candidate)
}

/// Scramble a known palindrome with `num_ops` random swap/rotate/mirror
/// edits to produce a solvable starting sequence.
///
/// Best-effort: the minimum operation count of the result is not
/// guaranteed to equal `num_ops`. If scrambling accidentally restores a
/// palindrome, one corrective swap of the first unequal adjacent pair is
/// applied.
pub fn scramble_palindrome(
    rng: &mut Mulberry32,
    target: &[Symbol],
    num_ops: usize,
) -> Vec<Symbol> {
    let n = target.len();
    if n < 2 {
        return target.to_vec();
    }

    let mut seq = target.to_vec();
    for _ in 0..num_ops {
        seq = match rng.next_range(0, 2) {
            0 => {
                let i = rng.next_range(0, (n - 2) as u32) as usize;
                apply_swap(&seq, i, i + 1)
            }
            1 => {
                let dir = if rng.next_f64() < 0.5 {
                    RotateDir::Left
                } else {
                    RotateDir::Right
                };
                apply_rotate(&seq, 0, n - 1, dir)
            }
            _ => {
                let start = rng.next_range(0, (n - 2) as u32) as usize;
                let end = rng.next_range((start + 1) as u32, (n - 1) as u32) as usize;
                apply_mirror(&seq, start, end)
            }
        };
    }

    if is_palindrome(&seq) {
        if let Some(i) = (0..n - 1).find(|&i| seq[i] != seq[i + 1]) {
            seq = apply_swap(&seq, i, i + 1);
        }
    }
    seq
}
