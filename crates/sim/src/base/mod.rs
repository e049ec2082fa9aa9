//! Base types for genome representation.
//!
//! This module provides the foundational types used by both simulation
//! engines: the closed site-state alphabet, fixed-length genomes, and the
//! seeded random number source.

mod alphabet;
mod genome;
mod rng;

pub use alphabet::Alphabet;
pub use genome::{circular_ranges, Genome};
pub use rng::{SeedSource, SimRng};
