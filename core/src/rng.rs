//! Seeded randomness for carving and endpoint selection
//!
//! Every random decision in this crate goes through [`MazeRng`], so the
//! same seed always yields the same maze, the same Start/End pair and the
//! same path. [`SimpleLCG`] is the default source: a Park-Miller
//! (MINSTD) generator using pure integer arithmetic.
//!
//! Constants:
//! - Multiplier (a): 48271
//! - Modulus (m): 2^31 - 1 = 2147483647
//!
//! Reference: https://en.wikipedia.org/wiki/Lehmer_random_number_generator

/// Source of uniform random indices.
pub trait MazeRng {
    /// Random index in `[0, len)`. `len` must be non-zero.
    fn choice_index(&mut self, len: usize) -> usize;
}

impl<R: MazeRng + ?Sized> MazeRng for &mut R {
    fn choice_index(&mut self, len: usize) -> usize {
        (**self).choice_index(len)
    }
}

const MODULUS: u64 = 2147483647; // 2^31 - 1
const MULTIPLIER: u64 = 48271;

/// Park-Miller Linear Congruential Generator
///
/// Same seed always produces the same sequence.
#[derive(Clone, Debug)]
pub struct SimpleLCG {
    state: u32,
}

impl SimpleLCG {
    /// Create a new LCG with the given seed
    ///
    /// Seeds are reduced modulo 2^31 - 1; a seed that reduces to 0 is
    /// replaced with 1 to avoid the degenerate all-zero sequence.
    pub fn new(seed: u32) -> Self {
        let reduced = (seed as u64 % MODULUS) as u32;
        Self {
            state: if reduced == 0 { 1 } else { reduced },
        }
    }

    fn advance(&mut self) {
        // u64 avoids overflow during multiplication
        self.state = ((self.state as u64 * MULTIPLIER) % MODULUS) as u32;
    }
}

impl MazeRng for SimpleLCG {
    /// Computes `(state * len) / M` after advancing, with no floating point.
    fn choice_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "choice_index over an empty range");
        self.advance();
        let scaled = (self.state as u64 * len as u64) / MODULUS;
        scaled as usize
    }
}
