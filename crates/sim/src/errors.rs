use thiserror::Error;

/// Errors raised while validating simulation parameters.
///
/// These are always surfaced at construction time; nothing in the engines
/// attempts to recover from an invalid configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Population size must be at least one individual.
    #[error("Invalid population size: {0} (must be at least 1)")]
    InvalidPopulationSize(usize),

    /// Genome length must be at least one site.
    #[error("Invalid genome length: {0} (must be at least 1)")]
    InvalidGenomeLength(usize),

    /// A probability-like rate was negative, above one or not finite.
    #[error("Invalid {name}: {value} (must be between 0.0 and 1.0)")]
    InvalidRate { name: &'static str, value: f64 },

    /// Sample size is below the minimum needed for pairwise analysis.
    #[error("Invalid sample size: {size} (must be at least {min})")]
    InvalidSampleSize { size: usize, min: usize },

    /// Only binary and four-state alphabets are supported.
    #[error("Unsupported alphabet size: {0} (must be 2 or 4)")]
    UnsupportedAlphabet(usize),

    /// The substitution model cannot be used with the configured alphabet.
    #[error("Substitution model '{model}' requires a four-state alphabet")]
    ModelAlphabetMismatch { model: &'static str },

    /// Transition/transversion ratio must be finite and positive.
    #[error("Invalid transition/transversion ratio: {0} (must be finite and > 0)")]
    InvalidKappa(f64),

    /// Generation cap of zero would stop the coalescent before it starts.
    #[error("Invalid generation cap: {0} (must be at least 1)")]
    InvalidGenerationCap(u64),

    /// A required builder parameter was never set.
    #[error("Missing required parameter: {0}")]
    MissingRequired(&'static str),
}

/// Errors for genome construction and comparison.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenomeError {
    /// A site state falls outside the alphabet.
    #[error("Invalid site state {state} for alphabet of size {size}")]
    InvalidState { state: u8, size: usize },

    /// A character could not be mapped to a site state.
    #[error("Invalid symbol in genome: '{0}'")]
    InvalidSymbol(char),

    /// Index outside the genome.
    #[error("Index {index} out of bounds (len = {len})")]
    OutOfBounds { index: usize, len: usize },

    /// Two genomes that must be comparable have different lengths.
    #[error("Genome length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// A population was built without any genome.
    #[error("Population must contain at least one genome")]
    EmptyPopulation,
}

/// Errors surfaced by the simulation engines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Genome(#[from] GenomeError),

    /// Sampling without replacement asked for more genomes than exist.
    #[error("Cannot sample {requested} genomes without replacement from a population of {available}")]
    SampleTooLarge { requested: usize, available: usize },

    /// Sampling requested zero genomes or zero pairs.
    #[error("Sample must contain at least one element")]
    EmptySample,

    /// Random pairs need at least two individuals.
    #[error("Cannot draw distinct pairs from a population of {0}")]
    PopulationTooSmallForPairs(usize),

    /// `fortrace` was called before any genealogy was built.
    #[error("No genealogy available: call backtrace() before fortrace()")]
    NotBacktraced,
}
