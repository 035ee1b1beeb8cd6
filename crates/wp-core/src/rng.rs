//! Deterministic RNG for the route search.
//!
//! Every solve owns its own `SolverRng`, seeded from `SolverConfig::seed`.
//! Two runs with the same seed, point set and iteration cap make identical
//! random choices.  Under a wall-clock budget the number of iterations can
//! differ between runs, so only the sequence of choices is reproducible.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Per-solve deterministic RNG.
///
/// Not shared between requests; a concurrent service gives every request
/// its own instance.
pub struct SolverRng(SmallRng);

impl SolverRng {
    pub fn new(seed: u64) -> Self {
        SolverRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
