//! Backward-time coalescent simulation with horizontal transfer.
//!
//! The coalescent traces the ancestry of a sample backward in time instead
//! of simulating the whole population forward, at a cost that depends on the
//! sample rather than on the population size. A run has two phases:
//!
//! - `backtrace` follows the sampled lineages back until every site has found
//!   its most recent common ancestor, recording an arena of ancestral nodes
//!   and the site ranges each inherited from its parents.
//! - `fortrace` draws an ancestral genome and replays the recorded history
//!   forward, placing mutations on every edge, to produce the sample.

pub mod arena;
pub mod engine;
pub mod segments;

pub use arena::{Edge, Genealogy, Node, NodeId};
pub use engine::{BacktraceOutcome, CoalescentSimulation};
pub use segments::{Segment, SegmentSet};
