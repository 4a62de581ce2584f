//! Deterministic string hashing and seeded pseudo-random streams.
//!
//! # Responsibility
//! - Map arbitrary string keys to stable `u32` seeds.
//! - Provide a small, reproducible PRNG stream for layout, jitter and masking.
//!
//! # Invariants
//! - `hash` uses only `u32` wraparound arithmetic; results are identical on
//!   every platform and across process restarts.
//! - `Prng::next_f64` is always in `[0, 1)` and never returns `1.0`.
//! - A stream is an owned value; two streams built from the same seed yield
//!   identical sequences.

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;
const MULBERRY_INCREMENT: u32 = 0x6D2B_79F5;
const U32_RANGE: f64 = 4_294_967_296.0;

/// FNV-1a fold over the Unicode code points of `seed`.
///
/// Each code point is folded as one unit (not per UTF-8 byte), so a key hashes
/// the same no matter how the caller stored it.
pub fn hash(seed: &str) -> u32 {
    seed.chars().fold(FNV_OFFSET_BASIS, |acc, ch| {
        (acc ^ u32::from(ch)).wrapping_mul(FNV_PRIME)
    })
}

/// mulberry32 pseudo-random stream.
///
/// Not thread-safe by sharing: each logical caller constructs and owns its
/// own stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prng {
    state: u32,
}

impl Prng {
    /// Creates a stream from a numeric seed.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Creates a stream seeded by `hash(key)`.
    pub fn from_key(key: &str) -> Self {
        Self::new(hash(key))
    }

    /// Advances the stream and returns the next raw 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let a = self.state;
        let mut t = (a ^ (a >> 15)).wrapping_mul(a | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Advances the stream and returns a float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / U32_RANGE
    }

    /// Returns a float in `[lo, hi)`; collapses to `lo` when `hi <= lo`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        let draw = self.next_f64();
        if hi <= lo {
            return lo;
        }
        lo + draw * (hi - lo)
    }
}

impl Iterator for Prng {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_f64())
    }
}
