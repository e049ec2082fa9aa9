//! Point substitution for genomes.
//!
//! Every site mutates independently with probability `rate` per generation.
//! A mutation always changes the state at the site; which state it becomes is
//! decided by the substitution kind:
//!
//! ## Uniform
//! Each of the `K - 1` other states of the alphabet is equally likely.
//!
//! ## Kimura (K2P)
//! Four-state only. A transition (A<->G, C<->T) happens with probability
//! `kappa / (kappa + 2)`, otherwise one of the two transversions is picked
//! uniformly. `kappa = 1` is equivalent to the uniform model.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::base::{Alphabet, Genome};
use crate::errors::ConfigError;

/// Above this rate the per-site scan is cheaper than geometric skipping.
const SPARSE_RATE_LIMIT: f64 = 0.1;

/// How a mutating site picks its new state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SubstitutionKind {
    /// All other states equally likely.
    #[default]
    Uniform,
    /// Kimura two-parameter model with transition/transversion ratio `kappa`.
    Kimura { kappa: f64 },
}

/// Per-site substitution process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionModel {
    rate: f64,
    alphabet: Alphabet,
    kind: SubstitutionKind,
}

impl SubstitutionModel {
    /// Build and validate a model.
    pub fn new(rate: f64, alphabet: Alphabet, kind: SubstitutionKind) -> Result<Self, ConfigError> {
        validate_probability("mutation rate", rate)?;
        if let SubstitutionKind::Kimura { kappa } = kind {
            if alphabet != Alphabet::Dna {
                return Err(ConfigError::ModelAlphabetMismatch { model: "kimura" });
            }
            if !kappa.is_finite() || kappa <= 0.0 {
                return Err(ConfigError::InvalidKappa(kappa));
            }
        }
        Ok(Self {
            rate,
            alphabet,
            kind,
        })
    }

    /// Uniform substitution over `alphabet`.
    pub fn uniform(rate: f64, alphabet: Alphabet) -> Result<Self, ConfigError> {
        Self::new(rate, alphabet, SubstitutionKind::Uniform)
    }

    /// Kimura two-parameter substitution on DNA.
    pub fn kimura(rate: f64, kappa: f64) -> Result<Self, ConfigError> {
        Self::new(rate, Alphabet::Dna, SubstitutionKind::Kimura { kappa })
    }

    #[inline(always)]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    #[inline(always)]
    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    #[inline(always)]
    pub fn kind(&self) -> SubstitutionKind {
        self.kind
    }

    /// Pick a new state for a site currently in `state`.
    ///
    /// The result always differs from `state`.
    #[inline]
    pub fn substitute<R: Rng + ?Sized>(&self, state: u8, rng: &mut R) -> u8 {
        match self.kind {
            SubstitutionKind::Uniform => {
                let k = self.alphabet.size() as u8;
                let r = rng.random_range(0..k - 1);
                if r >= state {
                    r + 1
                } else {
                    r
                }
            }
            SubstitutionKind::Kimura { kappa } => {
                if rng.random_bool(kappa / (kappa + 2.0)) {
                    // A=0 <-> G=2, C=1 <-> T=3
                    state ^ 2
                } else {
                    ((state & 1) ^ 1) + 2 * rng.random_range(0..2u8)
                }
            }
        }
    }

    /// Mutate every site of `genome` independently, returning the number of
    /// substitutions applied.
    pub fn mutate_genome<R: Rng + ?Sized>(&self, genome: &mut Genome, rng: &mut R) -> usize {
        if genome.is_empty() || self.rate <= 0.0 {
            return 0;
        }
        if self.rate > SPARSE_RATE_LIMIT {
            return self.mutate_dense(genome, rng);
        }

        let states = genome.as_mut_slice();
        let len = states.len();
        let log_1_minus_p = (-self.rate).ln_1p();
        let mut count = 0;
        let mut pos = 0usize;

        loop {
            // Inverse transform sampling of the geometric gap to the next hit
            let u: f64 = rng.random();
            let skip = (u.ln() / log_1_minus_p).floor();
            if !skip.is_finite() || skip >= (len - pos) as f64 {
                break;
            }
            pos += skip as usize;
            states[pos] = self.substitute(states[pos], rng);
            count += 1;
            pos += 1;
            if pos >= len {
                break;
            }
        }

        count
    }

    fn mutate_dense<R: Rng + ?Sized>(&self, genome: &mut Genome, rng: &mut R) -> usize {
        let mut count = 0;
        for i in 0..genome.len() {
            if rng.random_bool(self.rate) {
                let slot = &mut genome.as_mut_slice()[i];
                *slot = self.substitute(*slot, rng);
                count += 1;
            }
        }
        count
    }
}

pub(crate) fn validate_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidRate { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn rng(seed: u64) -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(seed)
    }

    #[test]
    fn test_substitution_model_invalid_rate() {
        assert!(SubstitutionModel::uniform(-0.1, Alphabet::Dna).is_err());
        assert!(SubstitutionModel::uniform(1.5, Alphabet::Dna).is_err());
        assert!(SubstitutionModel::uniform(f64::NAN, Alphabet::Dna).is_err());
        assert!(SubstitutionModel::uniform(0.0, Alphabet::Binary).is_ok());
    }

    #[test]
    fn test_kimura_requires_dna() {
        assert_eq!(
            SubstitutionModel::new(0.01, Alphabet::Binary, SubstitutionKind::Kimura { kappa: 2.0 }),
            Err(ConfigError::ModelAlphabetMismatch { model: "kimura" })
        );
        assert_eq!(
            SubstitutionModel::kimura(0.01, 0.0),
            Err(ConfigError::InvalidKappa(0.0))
        );
    }

    #[test]
    fn test_substitute_always_changes_state() {
        let mut rng = rng(11);
        let models = [
            SubstitutionModel::uniform(0.1, Alphabet::Binary).unwrap(),
            SubstitutionModel::uniform(0.1, Alphabet::Dna).unwrap(),
            SubstitutionModel::kimura(0.1, 3.0).unwrap(),
        ];
        for model in models {
            for state in 0..model.alphabet().size() as u8 {
                for _ in 0..200 {
                    let next = model.substitute(state, &mut rng);
                    assert_ne!(next, state);
                    assert!(model.alphabet().contains(next));
                }
            }
        }
    }

    #[test]
    fn test_binary_substitute_flips() {
        let model = SubstitutionModel::uniform(0.1, Alphabet::Binary).unwrap();
        let mut rng = rng(3);
        assert_eq!(model.substitute(0, &mut rng), 1);
        assert_eq!(model.substitute(1, &mut rng), 0);
    }

    #[test]
    fn test_uniform_substitute_distribution() {
        let model = SubstitutionModel::uniform(0.1, Alphabet::Dna).unwrap();
        let mut rng = rng(5);
        let mut counts = [0usize; 4];
        let trials = 30_000;
        for _ in 0..trials {
            counts[model.substitute(1, &mut rng) as usize] += 1;
        }
        assert_eq!(counts[1], 0);
        for state in [0, 2, 3] {
            let frac = counts[state] as f64 / trials as f64;
            assert!((frac - 1.0 / 3.0).abs() < 0.02, "state {state}: {frac}");
        }
    }

    #[test]
    fn test_kimura_transition_fraction() {
        let kappa = 4.0;
        let model = SubstitutionModel::kimura(0.1, kappa).unwrap();
        let mut rng = rng(9);
        let trials = 30_000;
        let transitions = (0..trials)
            .filter(|_| model.substitute(0, &mut rng) == 2)
            .count();
        let frac = transitions as f64 / trials as f64;
        let expected = kappa / (kappa + 2.0);
        assert!((frac - expected).abs() < 0.02, "{frac} vs {expected}");
    }

    #[test]
    fn test_mutate_genome_zero_rate() {
        let model = SubstitutionModel::uniform(0.0, Alphabet::Dna).unwrap();
        let mut genome = Genome::uniform(1000, 0);
        assert_eq!(model.mutate_genome(&mut genome, &mut rng(1)), 0);
        assert_eq!(genome, Genome::uniform(1000, 0));
    }

    #[test]
    fn test_mutate_genome_empty() {
        let model = SubstitutionModel::uniform(0.05, Alphabet::Dna).unwrap();
        let mut genome = Genome::uniform(0, 0);
        assert_eq!(model.mutate_genome(&mut genome, &mut rng(1)), 0);
    }

    #[test]
    fn test_mutate_genome_full_rate() {
        let model = SubstitutionModel::uniform(1.0, Alphabet::Binary).unwrap();
        let mut genome = Genome::uniform(64, 0);
        assert_eq!(model.mutate_genome(&mut genome, &mut rng(1)), 64);
        assert_eq!(genome, Genome::uniform(64, 1));
    }

    #[test]
    fn test_mutate_genome_count_matches_hamming() {
        // Every hit lands on a distinct site, so the count equals the distance
        let model = SubstitutionModel::uniform(0.01, Alphabet::Dna).unwrap();
        let original = Genome::uniform(10_000, 0);
        let mut genome = original.clone();
        let count = model.mutate_genome(&mut genome, &mut rng(21));
        assert_eq!(count, original.hamming(&genome).unwrap());
    }

    #[test]
    fn test_mutate_genome_sparse_and_dense_agree() {
        let len = 2_000;
        let reps = 200;
        let sparse = SubstitutionModel::uniform(0.05, Alphabet::Dna).unwrap();
        let dense = SubstitutionModel::uniform(0.15, Alphabet::Dna).unwrap();
        let mut rng = rng(17);

        let mean = |model: &SubstitutionModel, rng: &mut Xoshiro256PlusPlus| {
            let total: usize = (0..reps)
                .map(|_| model.mutate_genome(&mut Genome::uniform(len, 0), rng))
                .sum();
            total as f64 / reps as f64
        };

        let sparse_mean = mean(&sparse, &mut rng);
        let dense_mean = mean(&dense, &mut rng);
        assert!((sparse_mean - 100.0).abs() < 5.0, "sparse mean {sparse_mean}");
        assert!((dense_mean - 300.0).abs() < 8.0, "dense mean {dense_mean}");
    }

    #[test]
    fn test_mutate_genome_deterministic() {
        let model = SubstitutionModel::kimura(0.02, 2.0).unwrap();
        let mut a = Genome::uniform(500, 1);
        let mut b = Genome::uniform(500, 1);
        model.mutate_genome(&mut a, &mut rng(99));
        model.mutate_genome(&mut b, &mut rng(99));
        assert_eq!(a, b);
    }
}
