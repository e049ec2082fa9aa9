//! Forward-time Wright-Fisher engine.
//!
//! Every generation each of the N offspring slots picks a parent uniformly
//! from the previous generation, mutates its copy of the parent genome, and
//! with probability `p_transfer` overwrites a circular window of it with the
//! homologous window of a uniformly chosen donor. Parents and donors are both
//! read from the untouched previous generation.

use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::base::{Genome, SeedSource, SimRng};
use crate::errors::{ConfigError, GenomeError, SimulationError};
use crate::evolution::{SubstitutionModel, TransferModel};
use crate::simulation::{Initialization, Population, PopulationParams};

/// Event counts of one or more generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepSummary {
    /// Substitutions applied across all offspring
    pub mutations: usize,
    /// Offspring that received a transfer
    pub transfers: usize,
}

impl std::ops::AddAssign for StepSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.mutations += rhs.mutations;
        self.transfers += rhs.transfers;
    }
}

/// Main forward simulation engine.
#[derive(Debug, Clone)]
pub struct Simulation {
    params: PopulationParams,
    substitution: SubstitutionModel,
    transfer: TransferModel,
    /// Per-offspring per-generation transfer probability
    transfer_probability: f64,
    population: Population,
    /// Master RNG; offspring seeds are drawn from it sequentially
    rng: SimRng,
}

impl Simulation {
    /// Create a simulation seeded from `seed`, or from entropy if `None`.
    pub fn new(
        params: PopulationParams,
        initialization: Initialization,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(params, initialization, SeedSource::new(seed).master())
    }

    /// Create a simulation driven by an existing generator.
    pub fn with_rng(
        params: PopulationParams,
        initialization: Initialization,
        mut rng: SimRng,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        let substitution = params.substitution_model()?;
        let transfer = params.transfer_model()?;
        let transfer_probability = transfer.event_probability(params.genome_length);

        let population = match initialization {
            Initialization::Clonal => Population::clonal(
                params.population_size,
                params.genome_length,
                params.alphabet,
                &mut rng,
            ),
            Initialization::Random => Population::random(
                params.population_size,
                params.genome_length,
                params.alphabet,
                &mut rng,
            ),
        };

        log::debug!(
            "Forward simulation: N={} L={} mu={} p_transfer={:.3e}",
            params.population_size,
            params.genome_length,
            params.mutation.rate,
            transfer_probability
        );

        Ok(Self {
            params,
            substitution,
            transfer,
            transfer_probability,
            population,
            rng,
        })
    }

    /// Create a simulation from an existing population.
    ///
    /// The population must match `params` in size and genome length and only
    /// hold states of the configured alphabet.
    pub fn from_population(
        params: PopulationParams,
        population: Population,
        rng: SimRng,
    ) -> Result<Self, SimulationError> {
        params.validate()?;
        if population.size() != params.population_size {
            return Err(ConfigError::InvalidPopulationSize(population.size()).into());
        }
        if population.genome_length() != params.genome_length {
            return Err(GenomeError::LengthMismatch {
                left: params.genome_length,
                right: population.genome_length(),
            }
            .into());
        }
        if !population.is_valid(params.alphabet) {
            let size = params.alphabet.size();
            let state = population
                .genomes()
                .iter()
                .flat_map(|g| g.as_slice().iter().copied())
                .find(|&s| !params.alphabet.contains(s))
                .unwrap_or(size as u8);
            return Err(GenomeError::InvalidState { state, size }.into());
        }
        let substitution = params.substitution_model()?;
        let transfer = params.transfer_model()?;
        Ok(Self {
            transfer_probability: transfer.event_probability(params.genome_length),
            params,
            substitution,
            transfer,
            population,
            rng,
        })
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn into_population(self) -> Population {
        self.population
    }

    /// Number of generations simulated so far.
    pub fn generation(&self) -> u64 {
        self.population.generation()
    }

    pub fn params(&self) -> &PopulationParams {
        &self.params
    }

    /// Per-offspring per-generation transfer probability.
    pub fn transfer_probability(&self) -> f64 {
        self.transfer_probability
    }

    /// Advance the population by one generation.
    pub fn step(&mut self) -> Result<StepSummary, SimulationError> {
        let size = self.population.size();
        let length = self.params.genome_length;

        // Generate seeds for each offspring
        let seeds: Vec<u64> = (0..size).map(|_| self.rng.random()).collect();

        // Get immutable references for parallel access
        let parents = self.population.genomes();
        let substitution = &self.substitution;
        let transfer = &self.transfer;
        let p_transfer = self.transfer_probability;

        let offspring: Vec<(Genome, usize, bool)> = seeds
            .par_iter()
            .map(|&seed| -> Result<(Genome, usize, bool), GenomeError> {
                let mut local_rng = SimRng::seed_from_u64(seed);

                let parent = local_rng.random_range(0..size);
                let mut child = parents[parent].clone();
                let mutations = substitution.mutate_genome(&mut child, &mut local_rng);

                let transferred = p_transfer > 0.0 && local_rng.random_bool(p_transfer);
                if transferred {
                    let donor = local_rng.random_range(0..size);
                    let start = local_rng.random_range(0..length);
                    transfer.apply(&mut child, &parents[donor], start)?;
                }

                Ok((child, mutations, transferred))
            })
            .collect::<Result<_, _>>()?;

        let mut summary = StepSummary::default();
        let genomes = offspring
            .into_iter()
            .map(|(genome, mutations, transferred)| {
                summary.mutations += mutations;
                summary.transfers += usize::from(transferred);
                genome
            })
            .collect();

        self.population.replace(genomes);
        Ok(summary)
    }

    /// Advance the population by `generations` generations.
    pub fn advance(&mut self, generations: u64) -> Result<StepSummary, SimulationError> {
        let mut total = StepSummary::default();
        for _ in 0..generations {
            total += self.step()?;
        }
        Ok(total)
    }

    /// Clone `k` genomes of the current generation without replacement.
    pub fn sample(&mut self, k: usize) -> Result<Vec<Genome>, SimulationError> {
        self.population.sample(k, &mut self.rng)
    }

    /// Clone `k` genomes of the current generation with replacement.
    pub fn sample_with_replacement(&mut self, k: usize) -> Result<Vec<Genome>, SimulationError> {
        self.population.sample_with_replacement(k, &mut self.rng)
    }

    /// `count` random pairs of distinct individuals of the current generation.
    pub fn random_pairs(&mut self, count: usize) -> Result<Vec<(usize, usize)>, SimulationError> {
        self.population.random_pairs(count, &mut self.rng)
    }
}
