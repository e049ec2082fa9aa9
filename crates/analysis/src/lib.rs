//! # Analysis Crate
//!
//! Statistics for genomes sampled from the `hgtcov-sim` engines:
//! - Pairwise difference sets (all pairs or random pairs)
//! - Divergence summary (Ks, VarD) and the circular spatial covariance
//!   curves of the difference indicators (`CMatrix`)
//! - Running moments used to aggregate replicates

pub mod cmatrix;
pub mod differences;
pub mod errors;
pub mod moments;

pub use cmatrix::{CMatrix, CovCurves, DiversityStats};
pub use differences::{pair_differences, pairwise_differences, random_pair_differences};
pub use errors::AnalysisError;
pub use moments::{CurveMoments, DiversityMoments, Mean, Moments, Variance, VarianceEstimate};
