use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::{SplitMix64, Xoshiro256PlusPlus};

/// Random number generator used by every simulation component.
pub type SimRng = Xoshiro256PlusPlus;

/// Seed used to derive all random streams of a run.
///
/// A run is reproducible from its seed alone: the master stream drives
/// sequential decisions and `stream(i)` gives replicate `i` its own
/// independent generator regardless of which worker thread executes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSource {
    seed: u64,
}

impl SeedSource {
    /// Use `seed` if given, otherwise draw one from the thread RNG.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        log::debug!("Using random seed {seed}");
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generator seeded directly from the run seed.
    pub fn master(&self) -> SimRng {
        SimRng::seed_from_u64(self.seed)
    }

    /// Independent generator for stream `index`.
    ///
    /// The index is hashed through SplitMix64 before it is combined with the
    /// run seed, so nearby seeds and indices give unrelated states.
    pub fn stream(&self, index: u64) -> SimRng {
        let salt = SplitMix64::seed_from_u64(index).next_u64();
        SimRng::from_rng(&mut SplitMix64::seed_from_u64(self.seed ^ salt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streams_reproducible() {
        let a = SeedSource::new(Some(42));
        let b = SeedSource::new(Some(42));
        let xs: Vec<u64> = (0..8).map(|_| a.stream(3).random()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.stream(3).random()).collect();
        assert_eq!(xs, ys);
        assert_eq!(a.master().random::<u64>(), b.master().random::<u64>());
    }

    #[test]
    fn test_streams_distinct() {
        let source = SeedSource::new(Some(42));
        let first: u64 = source.stream(0).random();
        let second: u64 = source.stream(1).random();
        let master: u64 = source.master().random();
        assert_ne!(first, second);
        assert_ne!(first, master);
    }

    #[test]
    fn test_streams_unrelated_across_seeds() {
        // seed ^ index collisions must not give equal streams
        let a: u64 = SeedSource::new(Some(4)).stream(1).random();
        let b: u64 = SeedSource::new(Some(5)).stream(0).random();
        assert_ne!(a, b);
        let firsts: std::collections::HashSet<u64> = (0..64)
            .map(|i| SeedSource::new(Some(7)).stream(i).random())
            .collect();
        assert_eq!(firsts.len(), 64);
    }

    #[test]
    fn test_missing_seed_is_drawn() {
        let source = SeedSource::new(None);
        assert_eq!(source.seed(), source.seed());
    }
}
