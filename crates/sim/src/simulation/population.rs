//! Population management and sampling.
//!
//! A population is one generation of haploid genomes. It is replaced as a
//! whole by the engine every generation and never resized.

use rand::seq::index;
use rand::Rng;

use crate::base::{Alphabet, Genome};
use crate::errors::{GenomeError, SimulationError};

/// A population of haploid genomes of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    /// Genomes of the current generation
    genomes: Vec<Genome>,
    /// Generation counter
    generation: u64,
}

impl Population {
    /// Create a population from genomes, checking that it is non-empty and
    /// that all genomes have the same length.
    pub fn new(genomes: Vec<Genome>) -> Result<Self, GenomeError> {
        let first = genomes.first().ok_or(GenomeError::EmptyPopulation)?;
        if let Some(other) = genomes.iter().find(|g| g.len() != first.len()) {
            return Err(GenomeError::LengthMismatch {
                left: first.len(),
                right: other.len(),
            });
        }
        Ok(Self {
            genomes,
            generation: 0,
        })
    }

    /// `size` copies of a single random ancestor.
    pub fn clonal<R: Rng + ?Sized>(
        size: usize,
        length: usize,
        alphabet: Alphabet,
        rng: &mut R,
    ) -> Self {
        let ancestor = Genome::random(length, alphabet, rng);
        Self {
            genomes: vec![ancestor; size],
            generation: 0,
        }
    }

    /// `size` independent random genomes.
    pub fn random<R: Rng + ?Sized>(
        size: usize,
        length: usize,
        alphabet: Alphabet,
        rng: &mut R,
    ) -> Self {
        Self {
            genomes: (0..size)
                .map(|_| Genome::random(length, alphabet, rng))
                .collect(),
            generation: 0,
        }
    }

    /// Get the current generation number.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Get the number of genomes in the population.
    pub fn size(&self) -> usize {
        self.genomes.len()
    }

    /// Number of sites per genome.
    pub fn genome_length(&self) -> usize {
        self.genomes.first().map_or(0, Genome::len)
    }

    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    pub fn get(&self, index: usize) -> Option<&Genome> {
        self.genomes.get(index)
    }

    /// Replace the whole generation and advance the counter.
    pub(crate) fn replace(&mut self, genomes: Vec<Genome>) {
        debug_assert_eq!(genomes.len(), self.genomes.len());
        self.genomes = genomes;
        self.generation += 1;
    }

    /// Return `true` if every genome has the population's length and only
    /// states from `alphabet`.
    pub fn is_valid(&self, alphabet: Alphabet) -> bool {
        let length = self.genome_length();
        self.genomes
            .iter()
            .all(|g| g.len() == length && g.is_valid(alphabet))
    }

    /// Clone `k` distinct genomes chosen uniformly without replacement.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        k: usize,
        rng: &mut R,
    ) -> Result<Vec<Genome>, SimulationError> {
        if k == 0 {
            return Err(SimulationError::EmptySample);
        }
        if k > self.size() {
            return Err(SimulationError::SampleTooLarge {
                requested: k,
                available: self.size(),
            });
        }
        Ok(index::sample(rng, self.size(), k)
            .into_iter()
            .map(|i| self.genomes[i].clone())
            .collect())
    }

    /// Clone `k` genomes chosen uniformly with replacement.
    pub fn sample_with_replacement<R: Rng + ?Sized>(
        &self,
        k: usize,
        rng: &mut R,
    ) -> Result<Vec<Genome>, SimulationError> {
        if k == 0 {
            return Err(SimulationError::EmptySample);
        }
        Ok((0..k)
            .map(|_| self.genomes[rng.random_range(0..self.size())].clone())
            .collect())
    }

    /// `count` random unordered pairs of distinct individuals, each as
    /// `(i, j)` with `i < j`. Pairs may repeat.
    pub fn random_pairs<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<(usize, usize)>, SimulationError> {
        if self.size() < 2 {
            return Err(SimulationError::PopulationTooSmallForPairs(self.size()));
        }
        Ok((0..count)
            .map(|_| {
                let pair = index::sample(rng, self.size(), 2);
                let (a, b) = (pair.index(0), pair.index(1));
                (a.min(b), a.max(b))
            })
            .collect())
    }
}
