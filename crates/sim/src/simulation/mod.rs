//! Forward-time simulation and replicate management.
//!
//! The most commonly used types are re-exported here:
//!
//! - `Simulation`: the Wright-Fisher engine that resamples, mutates and
//!   transfers fragments every generation.
//! - `Population`: the current generation of genomes.
//! - `SimulationBuilder`: fluent builder for both engines.
//! - `ReplicatePool`: runs independent replicates on worker threads.

pub mod builder;
pub mod engine;
pub mod parameters;
pub mod population;
pub mod replicates;

pub use builder::SimulationBuilder;
pub use engine::{Simulation, StepSummary};
pub use parameters::{
    CoalescentParams, Initialization, MutationConfig, PopulationParams, TransferConfig,
    DEFAULT_CAP_FACTOR,
};
pub use population::Population;
pub use replicates::ReplicatePool;
