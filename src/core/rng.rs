//! RNG module - seeded pseudo-random generation
//!
//! Implements a 32-bit mulberry-style generator: the state advances by a
//! fixed odd increment per call and two xorshift/multiply mixing rounds
//! produce the output. Fast, adequate spread, fully determined by the seed.
//! Not cryptographically secure; never use it where unpredictability
//! against an adversary matters.
//!
//! Also provides the rolling hash that turns a canonical `YYYY-MM-DD` date
//! string into a seed.

/// Fixed odd state increment (the mulberry32 constant)
const STATE_INCREMENT: u32 = 0x6D2B_79F5;

/// Seeded 32-bit PRNG
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    /// Create a new generator with the given seed
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Create a generator seeded from the system clock.
    ///
    /// Used by continuous-play modes where determinism is not wanted.
    pub fn from_entropy() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);
        Self::new(nanos ^ secs.rotate_left(16))
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(STATE_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Generate a float in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// Generate a value in the inclusive range `[min, max]`
    pub fn next_range(&mut self, min: u32, max: u32) -> u32 {
        debug_assert!(min <= max);
        let span = f64::from(max - min) + 1.0;
        min + (self.next_f64() * span) as u32
    }

    /// Pick a uniformly random element of a non-empty slice
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let idx = self.next_range(0, items.len() as u32 - 1) as usize;
        &items[idx]
    }

    /// Get the current state (for diagnostics)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Hash a canonical `YYYY-MM-DD` date string into a 32-bit seed.
///
/// Rolling multiply-shift-add over bytes: `h = (h << 5) - h + byte`,
/// wrapping. Identical for identical strings on every machine, regardless
/// of caller locale or timezone.
pub fn hash_date(date: &str) -> u32 {
    let mut hash: u32 = 0;
    for byte in date.bytes() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(u32::from(byte));
    }
    hash
}
