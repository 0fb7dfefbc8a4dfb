//! RNG module - deterministic piece generation
//!
//! The board draws every new piece from a small LCG so that a session seeded
//! with the same value deals the same pieces, which keeps cascades reproducible
//! for tests, replays and benchmarks.

use crate::types::PieceType;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of a power-of-two LCG cycle quickly.
    pub fn next_range(&mut self, max: u32) -> u32 {
        debug_assert!(max > 0);
        (self.next_u32() >> 16) % max.max(1)
    }

    /// Pick one piece type uniformly from a non-empty set
    pub fn pick(&mut self, types: &[PieceType]) -> PieceType {
        types[self.next_range(types.len() as u32) as usize]
    }

    /// Pick one piece type from `types` that is not in `excluded`.
    ///
    /// Falls back to the full set when every candidate is excluded, so the
    /// draw always terminates.
    pub fn pick_excluding(&mut self, types: &[PieceType], excluded: &[PieceType]) -> PieceType {
        let allowed = types.iter().filter(|t| !excluded.contains(t)).count();
        if allowed == 0 {
            return self.pick(types);
        }
        let mut nth = self.next_range(allowed as u32) as usize;
        for t in types {
            if excluded.contains(t) {
                continue;
            }
            if nth == 0 {
                return *t;
            }
            nth -= 1;
        }
        unreachable!("allowed count covers every candidate")
    }

    /// Current RNG state (for restarting a session with the same sequence)
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
