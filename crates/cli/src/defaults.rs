//! Shared default values for the run subcommands.
//! Forward and trajectory runs share one model default set; coalescent runs
//! default to a much larger population with lower rates.

/// Model defaults that differ between forward and coalescent runs.
#[derive(Debug, Clone, Copy)]
pub struct ModelDefaults {
    pub population_size: usize,
    pub genome_length: usize,
    pub fragment: usize,
    pub mutation_rate: f64,
    pub transfer_rate: f64,
}

pub const FORWARD: ModelDefaults = ModelDefaults {
    population_size: 1000,
    genome_length: 1000,
    fragment: 100,
    mutation_rate: 1e-4,
    transfer_rate: 1e-4,
};

pub const COALESCENT: ModelDefaults = ModelDefaults {
    population_size: 1_000_000,
    genome_length: 10_000,
    fragment: 100,
    mutation_rate: 1e-8,
    transfer_rate: 1e-6,
};

pub const GENERATIONS: u64 = 10_000;
pub const FORWARD_SAMPLE: usize = 100;
pub const COALESCENT_SAMPLE: usize = 2;
pub const REPLICATES: usize = 1000;
pub const MAXL: usize = 100;
pub const TRAJECTORY_STEP: u64 = 1000;

pub const FORWARD_PREFIX: &str = "hgtfwd";
pub const COALESCENT_PREFIX: &str = "hgtcoal";
pub const TRAJECTORY_PREFIX: &str = "hgttraj";
