//! Simulation parameters and configuration.
//!
//! All parameter structures are plain serializable values. They are validated
//! once, when an engine is constructed, and never change afterwards.

use serde::{Deserialize, Serialize};

use crate::base::Alphabet;
use crate::errors::ConfigError;
use crate::evolution::{SubstitutionKind, SubstitutionModel, TransferModel, TransferUnit};

/// Default coalescent generation cap, in multiples of the population size.
pub const DEFAULT_CAP_FACTOR: u64 = 100;

/// Parameters for point substitution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Per-site per-generation substitution probability
    pub rate: f64,
    /// How a mutated site picks its new state
    #[serde(default)]
    pub model: SubstitutionKind,
}

impl MutationConfig {
    pub fn new(rate: f64, model: SubstitutionKind) -> Self {
        Self { rate, model }
    }

    pub fn uniform(rate: f64) -> Self {
        Self::new(rate, SubstitutionKind::Uniform)
    }
}

/// Parameters for horizontal transfer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Transfer rate, interpreted according to `unit`
    pub rate: f64,
    /// Number of sites copied per event
    pub fragment: usize,
    #[serde(default)]
    pub unit: TransferUnit,
}

impl TransferConfig {
    pub fn new(rate: f64, fragment: usize) -> Self {
        Self {
            rate,
            fragment,
            unit: TransferUnit::PerSite,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

/// Population-level model parameters shared by the forward and coalescent engines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationParams {
    /// Number of haploid genomes (N)
    pub population_size: usize,
    /// Number of sites per genome (L)
    pub genome_length: usize,
    #[serde(default)]
    pub alphabet: Alphabet,
    #[serde(default)]
    pub mutation: MutationConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
}

impl PopulationParams {
    /// Parameters with no mutation and no transfer.
    pub fn new(population_size: usize, genome_length: usize) -> Self {
        Self {
            population_size,
            genome_length,
            alphabet: Alphabet::default(),
            mutation: MutationConfig::default(),
            transfer: TransferConfig::default(),
        }
    }

    /// Validate sizes, rates and model/alphabet compatibility.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::InvalidPopulationSize(self.population_size));
        }
        if self.genome_length == 0 {
            return Err(ConfigError::InvalidGenomeLength(self.genome_length));
        }
        self.substitution_model()?;
        self.transfer_model()?;
        Ok(())
    }

    /// Build the substitution model described by these parameters.
    pub fn substitution_model(&self) -> Result<SubstitutionModel, ConfigError> {
        SubstitutionModel::new(self.mutation.rate, self.alphabet, self.mutation.model)
    }

    /// Build the transfer model described by these parameters.
    pub fn transfer_model(&self) -> Result<TransferModel, ConfigError> {
        TransferModel::new(
            self.transfer.rate,
            self.transfer.fragment,
            self.transfer.unit,
        )
    }
}

/// How the initial forward population is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Initialization {
    /// One random ancestor copied into every slot.
    #[default]
    Clonal,
    /// Every genome drawn independently at random.
    Random,
}

/// Parameters of a coalescent run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoalescentParams {
    #[serde(flatten)]
    pub population: PopulationParams,
    /// Number of sampled genomes
    pub sample_size: usize,
    /// Maximum number of generations traced backward; defaults to
    /// `DEFAULT_CAP_FACTOR * population_size`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_cap: Option<u64>,
}

impl CoalescentParams {
    pub fn new(population: PopulationParams, sample_size: usize) -> Self {
        Self {
            population,
            sample_size,
            generation_cap: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.population.validate()?;
        if self.sample_size < 2 {
            return Err(ConfigError::InvalidSampleSize {
                size: self.sample_size,
                min: 2,
            });
        }
        if self.generation_cap == Some(0) {
            return Err(ConfigError::InvalidGenerationCap(0));
        }
        Ok(())
    }

    /// The effective generation cap.
    pub fn cap(&self) -> u64 {
        self.generation_cap.unwrap_or_else(|| {
            (self.population.population_size as u64).saturating_mul(DEFAULT_CAP_FACTOR)
        })
    }
}
