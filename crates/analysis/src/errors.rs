use hgtcov_sim::errors::GenomeError;
use thiserror::Error;

/// Errors raised by the divergence and covariance statistics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// No pair was supplied, so no statistic is defined.
    #[error("At least one pair of genomes is required")]
    NoPairs,

    /// The number of difference sets does not match `n(n-1)/2`.
    #[error("Expected {expected} difference sets for the sample, found {found}")]
    PairCountMismatch { expected: usize, found: usize },

    /// A difference position lies outside the genome.
    #[error("Pair {pair}: position {position} out of range for genome length {length}")]
    PositionOutOfRange {
        pair: usize,
        position: usize,
        length: usize,
    },

    /// Difference positions must be strictly ascending.
    #[error("Pair {pair}: difference positions are not strictly ascending")]
    UnsortedDifferences { pair: usize },

    /// The maximum lag must be between 1 and the genome length.
    #[error("Invalid maximum lag {maxl} (must be between 1 and {length})")]
    LagOutOfRange { maxl: usize, length: usize },

    /// Two inputs that must have the same length do not.
    #[error("Length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// Genome length of zero.
    #[error("Genome length must be at least 1")]
    EmptyGenomeLength,

    /// Pairwise statistics need at least two genomes.
    #[error("At least 2 genomes are required, found {0}")]
    TooFewGenomes(usize),

    #[error(transparent)]
    Genome(#[from] GenomeError),
}
