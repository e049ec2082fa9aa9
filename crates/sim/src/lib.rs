//! # Simulation Crate
//!
//! The `sim` crate provides the genome-generating engines of hgtcov.
//! It includes modules for defining genomes and alphabets, the mutation and
//! horizontal-transfer operators, a forward-time Wright-Fisher engine, its
//! backward-time coalescent counterpart, and the replicate pool used to run
//! many independent simulations in parallel.

pub mod base;
pub mod coalescent;
pub mod errors;
pub mod evolution;
pub mod simulation;
pub mod prelude;

pub use base::{Alphabet, Genome, SeedSource, SimRng};
