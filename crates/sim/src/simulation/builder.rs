//! Builder pattern for creating simulations.
//!
//! Provides a fluent API for configuring the forward and coalescent engines
//! from the same set of model parameters.

use crate::base::Alphabet;
use crate::coalescent::CoalescentSimulation;
use crate::errors::ConfigError;
use crate::evolution::{SubstitutionKind, TransferUnit};
use crate::simulation::{
    CoalescentParams, Initialization, MutationConfig, PopulationParams, Simulation,
    TransferConfig,
};

/// Builder for constructing simulations with a fluent API.
///
/// # Examples
///
/// ```
/// use hgtcov_sim::simulation::SimulationBuilder;
///
/// // Forward simulation with defaults (DNA, no transfer)
/// let sim = SimulationBuilder::new()
///     .population_size(50)
///     .genome_length(200)
///     .mutation_rate(1e-3)
///     .seed(42)
///     .build()
///     .unwrap();
/// assert_eq!(sim.population().size(), 50);
///
/// // Coalescent sample of 10 genomes with transfer
/// let coal = SimulationBuilder::new()
///     .population_size(1000)
///     .genome_length(500)
///     .mutation_rate(1e-5)
///     .transfer(1e-6, 50)
///     .seed(42)
///     .build_coalescent(10)
///     .unwrap();
/// assert_eq!(coal.params().sample_size, 10);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationBuilder {
    // Required parameters
    population_size: Option<usize>,
    genome_length: Option<usize>,

    // Evolutionary parameters (with defaults)
    alphabet: Alphabet,             // Default: DNA
    mutation: MutationConfig,       // Default: no mutation
    transfer: TransferConfig,       // Default: no transfer
    initialization: Initialization, // Default: clonal
    generation_cap: Option<u64>,    // Default: DEFAULT_CAP_FACTOR * N
    seed: Option<u64>,              // Default: None (random)
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationBuilder {
    /// Create a new simulation builder with default values.
    pub fn new() -> Self {
        Self {
            population_size: None,
            genome_length: None,
            alphabet: Alphabet::Dna,
            mutation: MutationConfig::default(),
            transfer: TransferConfig::default(),
            initialization: Initialization::Clonal,
            generation_cap: None,
            seed: None,
        }
    }

    /// Set the population size (required).
    pub fn population_size(mut self, size: usize) -> Self {
        self.population_size = Some(size);
        self
    }

    /// Set the genome length in sites (required).
    pub fn genome_length(mut self, length: usize) -> Self {
        self.genome_length = Some(length);
        self
    }

    /// Set the site alphabet (default: DNA).
    pub fn alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    /// Set the per-site mutation rate (default: 0.0).
    pub fn mutation_rate(mut self, rate: f64) -> Self {
        self.mutation.rate = rate;
        self
    }

    /// Use the Kimura two-parameter substitution model with ratio `kappa`.
    pub fn kimura(mut self, kappa: f64) -> Self {
        self.mutation.model = SubstitutionKind::Kimura { kappa };
        self
    }

    /// Set the transfer rate and fragment length (default: no transfer).
    pub fn transfer(mut self, rate: f64, fragment: usize) -> Self {
        self.transfer.rate = rate;
        self.transfer.fragment = fragment;
        self
    }

    /// Set the unit the transfer rate is expressed in (default: per site).
    pub fn transfer_unit(mut self, unit: TransferUnit) -> Self {
        self.transfer.unit = unit;
        self
    }

    /// Set how the forward population is initialised (default: clonal).
    pub fn initialization(mut self, initialization: Initialization) -> Self {
        self.initialization = initialization;
        self
    }

    /// Override the coalescent generation cap.
    pub fn generation_cap(mut self, cap: u64) -> Self {
        self.generation_cap = Some(cap);
        self
    }

    /// Set the random seed for reproducibility (default: None = random).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Collect and validate the model parameters.
    pub fn params(&self) -> Result<PopulationParams, ConfigError> {
        let params = PopulationParams {
            population_size: self
                .population_size
                .ok_or(ConfigError::MissingRequired("population_size"))?,
            genome_length: self
                .genome_length
                .ok_or(ConfigError::MissingRequired("genome_length"))?,
            alphabet: self.alphabet,
            mutation: self.mutation,
            transfer: self.transfer,
        };
        params.validate()?;
        Ok(params)
    }

    /// Build and validate the forward simulation.
    pub fn build(self) -> Result<Simulation, ConfigError> {
        Simulation::new(self.params()?, self.initialization, self.seed)
    }

    /// Build and validate a coalescent simulation of `sample_size` genomes.
    pub fn build_coalescent(self, sample_size: usize) -> Result<CoalescentSimulation, ConfigError> {
        let params = CoalescentParams {
            population: self.params()?,
            sample_size,
            generation_cap: self.generation_cap,
        };
        CoalescentSimulation::new(params, self.seed)
    }
}
