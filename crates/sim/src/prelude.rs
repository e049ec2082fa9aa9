//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use hgtcov_sim::prelude::*;
//!
//! let genome = Genome::parse("ACGT", Alphabet::Dna).unwrap();
//! assert_eq!(genome.len(), 4);
//! ```

pub use crate::base::{Alphabet, Genome, SeedSource, SimRng};
pub use crate::coalescent::{BacktraceOutcome, CoalescentSimulation};
pub use crate::errors::{ConfigError, GenomeError, SimulationError};
pub use crate::evolution::{SubstitutionKind, SubstitutionModel, TransferModel, TransferUnit};
pub use crate::simulation::{
    CoalescentParams, Initialization, MutationConfig, Population, PopulationParams, ReplicatePool,
    Simulation, SimulationBuilder, StepSummary, TransferConfig,
};
