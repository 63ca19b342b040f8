//! TTL jitter sources.
//!
//! Jitter is injected as a dependency rather than pulled from a process-wide
//! RNG so that TTL computation stays reproducible in tests: seed a
//! [`RandomJitter`] and the engine's write path becomes deterministic.

use std::{sync::Mutex, time::Duration};

use rand::{Rng, SeedableRng, rngs::SmallRng};

/// A source of uniform random durations for TTL jitter.
pub trait Jitter: Send + Sync {
    /// Sample a duration uniformly from the half-open interval `[0, bound)`.
    ///
    /// A zero `bound` must yield zero.
    fn sample(&self, bound: Duration) -> Duration;
}

/// Jitter backed by a seedable PRNG.
///
/// The generator sits behind a mutex so the engine stays shareable across
/// tasks; the critical section is a single RNG step.
pub struct RandomJitter {
    rng: Mutex<SmallRng>,
}

impl RandomJitter {
    /// Create a jitter source seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(SmallRng::from_os_rng()),
        }
    }

    /// Create a jitter source with a fixed seed, for reproducible tests.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomJitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Jitter for RandomJitter {
    fn sample(&self, bound: Duration) -> Duration {
        let nanos = bound.as_nanos() as u64;
        if nanos == 0 {
            return Duration::ZERO;
        }
        // A poisoned mutex only means another sampler panicked mid-step;
        // the RNG state is still usable.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        Duration::from_nanos(rng.random_range(0..nanos))
    }
}

/// A jitter source that always yields zero.
pub struct NoJitter;

impl Jitter for NoJitter {
    fn sample(&self, _bound: Duration) -> Duration {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_stays_in_half_open_interval() {
        let jitter = RandomJitter::from_seed(7);
        let bound = Duration::from_secs(5);
        for _ in 0..1000 {
            let sampled = jitter.sample(bound);
            assert!(sampled < bound);
        }
    }

    #[test]
    fn zero_bound_yields_zero() {
        let jitter = RandomJitter::from_seed(7);
        assert_eq!(jitter.sample(Duration::ZERO), Duration::ZERO);
        assert_eq!(NoJitter.sample(Duration::from_secs(5)), Duration::ZERO);
    }

    #[test]
    fn seeded_jitter_is_reproducible() {
        let a = RandomJitter::from_seed(42);
        let b = RandomJitter::from_seed(42);
        let bound = Duration::from_secs(10);
        for _ in 0..100 {
            assert_eq!(a.sample(bound), b.sample(bound));
        }
    }
}
