pub mod coalescent;
pub mod forward;
pub mod trajectory;

use anyhow::{Context, Result};

use hgtcov_analysis::{pair_differences, CMatrix, CovCurves, DiversityStats};
use hgtcov_sim::prelude::*;

/// Statistics of one sampled snapshot.
pub type Snapshot = (DiversityStats, CovCurves);

/// Sample the current population of `sim` and compute its statistics.
///
/// With `pairs` set, that many random pairs of the whole population are
/// compared; otherwise all pairs of a sample of `sample` genomes.
pub fn analyse_population(
    sim: &mut Simulation,
    sample: usize,
    pairs: Option<usize>,
    maxl: usize,
) -> Result<Snapshot> {
    let cmatrix = match pairs {
        Some(count) => {
            let picks = sim.random_pairs(count)?;
            let genomes = sim.population().genomes();
            let diffs = picks
                .iter()
                .map(|&(a, b)| pair_differences(&genomes[a], &genomes[b]))
                .collect::<Result<Vec<_>, _>>()?;
            CMatrix::from_pairs(sim.params().genome_length, diffs)?
        }
        None => {
            let genomes = sim.sample(sample)?;
            CMatrix::from_genomes(&genomes)?
        }
    };
    analyse(&cmatrix, maxl)
}

pub fn analyse(cmatrix: &CMatrix, maxl: usize) -> Result<Snapshot> {
    let curves = cmatrix
        .cov_circle(maxl)
        .context("Failed to compute covariance curves")?;
    Ok((cmatrix.d(), curves))
}
