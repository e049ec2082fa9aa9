use clap::Args;
use std::path::PathBuf;

use hgtcov_sim::prelude::*;

use crate::defaults::{self, ModelDefaults};

/// Population model flags shared by every subcommand.
///
/// Unset values fall back to the defaults of the subcommand in use.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Population size (N)
    #[arg(short = 'n', long)]
    pub size: Option<usize>,

    /// Genome length in sites (L)
    #[arg(short = 'l', long)]
    pub length: Option<usize>,

    /// Site alphabet (binary, dna)
    #[arg(long, default_value = "dna")]
    pub alphabet: Alphabet,

    /// Mutation rate per site per generation
    #[arg(short = 'm', long)]
    pub mutation: Option<f64>,

    /// Transition/transversion ratio
    ///
    /// Switches substitutions to the Kimura two-parameter model (DNA only).
    #[arg(long)]
    pub kappa: Option<f64>,

    /// Transfer rate per site per generation
    #[arg(long)]
    pub transfer: Option<f64>,

    /// Number of contiguous sites copied by one transfer (F)
    #[arg(short = 'f', long)]
    pub fragment: Option<usize>,

    /// Read the transfer rate as a per-genome probability
    #[arg(long)]
    pub per_genome: bool,
}

impl ModelArgs {
    /// Combine the flags with `defaults` into model parameters.
    pub fn resolve(&self, defaults: &ModelDefaults) -> PopulationParams {
        let mutation_rate = self.mutation.unwrap_or(defaults.mutation_rate);
        let mutation = match self.kappa {
            Some(kappa) => MutationConfig::new(mutation_rate, SubstitutionKind::Kimura { kappa }),
            None => MutationConfig::uniform(mutation_rate),
        };
        let mut transfer = TransferConfig::new(
            self.transfer.unwrap_or(defaults.transfer_rate),
            self.fragment.unwrap_or(defaults.fragment),
        );
        if self.per_genome {
            transfer.unit = TransferUnit::PerGenome;
        }

        PopulationParams {
            population_size: self.size.unwrap_or(defaults.population_size),
            genome_length: self.length.unwrap_or(defaults.genome_length),
            alphabet: self.alphabet,
            mutation,
            transfer,
        }
    }
}

/// Analysis and output flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Number of lags of the covariance curves
    ///
    /// Raised to twice the fragment length (capped at the genome length) when smaller.
    #[arg(long, default_value_t = defaults::MAXL)]
    pub maxl: usize,

    /// Random seed (default: drawn from entropy and echoed in the config file)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Prefix of the output files
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Load the run configuration from a JSON file instead of flags
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Args, Debug)]
pub struct ForwardArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Generations simulated per replicate
    #[arg(short = 'g', long, default_value_t = defaults::GENERATIONS)]
    pub generations: u64,

    /// Genomes sampled at the end of each replicate
    #[arg(short, long, default_value_t = defaults::FORWARD_SAMPLE)]
    pub sample: usize,

    /// Analyse this many random pairs of the whole population instead of a sample
    #[arg(long)]
    pub pairs: Option<usize>,

    /// Number of independent replicates
    #[arg(short, long, default_value_t = defaults::REPLICATES)]
    pub reps: usize,

    /// Replicates run concurrently (default: number of logical CPUs)
    #[arg(short, long)]
    pub workers: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct CoalescentArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Sampled genomes per replicate
    #[arg(short, long, default_value_t = defaults::COALESCENT_SAMPLE)]
    pub sample: usize,

    /// Number of independent replicates
    #[arg(short, long, default_value_t = defaults::REPLICATES)]
    pub reps: usize,

    /// Maximum generations traced backward (default: 100 x population size)
    #[arg(long)]
    pub cap: Option<u64>,

    /// Replicates run concurrently (default: number of logical CPUs)
    #[arg(short, long)]
    pub workers: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct TrajectoryArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Total generations simulated
    #[arg(short = 'g', long, default_value_t = defaults::GENERATIONS)]
    pub generations: u64,

    /// Generations between two snapshots
    #[arg(long, default_value_t = defaults::TRAJECTORY_STEP)]
    pub step: u64,

    /// Genomes sampled at each snapshot
    #[arg(short, long, default_value_t = defaults::FORWARD_SAMPLE)]
    pub sample: usize,

    /// Analyse this many random pairs of the whole population instead of a sample
    #[arg(long)]
    pub pairs: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}
