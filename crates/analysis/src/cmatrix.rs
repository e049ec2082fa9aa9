//! Divergence and circular spatial covariance of pairwise differences.
//!
//! For `P` pairs on a circular genome of `L` sites, let `x_i(p)` be 1 when
//! pair `i` differs at site `p` and `m_i = d_i / L` its divergence. For every
//! lag `l` in `0..maxl`:
//!
//! - `xy[l]   = (1/(P*L)) * sum_i sum_p x_i(p) x_i(p+l)`
//! - `xsys[l] = (1/P) * sum_i m_i^2`
//! - `scov[l] = xy[l] - xsys[l]` (within-pair covariance)
//! - `smxy[l] = (1/L) * sum_p xbar(p) xbar(p+l)` with `xbar(p) = (1/P) * sum_i x_i(p)`
//! - `rcov[l] = smxy[l] - ks^2` (covariance of the pair-averaged indicator)
//!
//! Positions wrap modulo `L`, so every lag is averaged over exactly `P*L`
//! (pair, site) samples. Transferred fragments make differences cluster along
//! the genome, which shows up as `scov` decaying with lag over the fragment
//! length; point mutations alone leave it flat at zero.

use hgtcov_sim::base::Genome;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::differences::pairwise_differences;
use crate::errors::AnalysisError;
use crate::moments::{Variance, VarianceEstimate};

/// Divergence summary of a set of pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiversityStats {
    /// Mean per-site divergence across pairs
    pub ks: f64,
    /// Variance of per-pair divergence across pairs
    pub var_d: VarianceEstimate,
    /// Number of pairs
    pub pairs: usize,
}

/// The five covariance curves, indexed by lag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CovCurves {
    pub scov: Vec<f64>,
    pub rcov: Vec<f64>,
    pub xy: Vec<f64>,
    pub xsys: Vec<f64>,
    pub smxy: Vec<f64>,
}

impl CovCurves {
    pub fn maxl(&self) -> usize {
        self.scov.len()
    }
}

/// Validated difference sets of a sample on a circular genome.
#[derive(Debug, Clone, PartialEq)]
pub struct CMatrix {
    length: usize,
    diffs: Vec<Vec<usize>>,
}

impl CMatrix {
    /// Build from the difference sets of all `n(n-1)/2` pairs of a sample of
    /// `sample_size` genomes.
    pub fn new(
        sample_size: usize,
        length: usize,
        diffs: Vec<Vec<usize>>,
    ) -> Result<Self, AnalysisError> {
        let expected = sample_size * sample_size.saturating_sub(1) / 2;
        if diffs.len() != expected {
            return Err(AnalysisError::PairCountMismatch {
                expected,
                found: diffs.len(),
            });
        }
        Self::from_pairs(length, diffs)
    }

    /// Build from an arbitrary collection of pair difference sets.
    pub fn from_pairs(length: usize, diffs: Vec<Vec<usize>>) -> Result<Self, AnalysisError> {
        if length == 0 {
            return Err(AnalysisError::EmptyGenomeLength);
        }
        if diffs.is_empty() {
            return Err(AnalysisError::NoPairs);
        }
        for (pair, positions) in diffs.iter().enumerate() {
            if positions.windows(2).any(|w| w[0] >= w[1]) {
                return Err(AnalysisError::UnsortedDifferences { pair });
            }
            if let Some(&position) = positions.last().filter(|&&p| p >= length) {
                return Err(AnalysisError::PositionOutOfRange {
                    pair,
                    position,
                    length,
                });
            }
        }
        Ok(Self { length, diffs })
    }

    /// Build from all pairs of `genomes`.
    pub fn from_genomes(genomes: &[Genome]) -> Result<Self, AnalysisError> {
        let length = genomes.first().map_or(0, Genome::len);
        Self::new(genomes.len(), length, pairwise_differences(genomes)?)
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of pairs.
    pub fn pairs(&self) -> usize {
        self.diffs.len()
    }

    pub fn differences(&self) -> &[Vec<usize>] {
        &self.diffs
    }

    /// Mean per-site divergence across pairs.
    pub fn ks(&self) -> f64 {
        let total: usize = self.diffs.iter().map(Vec::len).sum();
        total as f64 / (self.pairs() * self.length) as f64
    }

    /// Mean divergence and its variance across pairs.
    ///
    /// With a single pair the variance is [`VarianceEstimate::Undefined`].
    pub fn d(&self) -> DiversityStats {
        let mut variance = Variance::new();
        for positions in &self.diffs {
            variance.increment(positions.len() as f64 / self.length as f64);
        }
        DiversityStats {
            ks: self.ks(),
            var_d: variance.result(),
            pairs: self.pairs(),
        }
    }

    /// Circular covariance curves for lags `0..maxl`.
    pub fn cov_circle(&self, maxl: usize) -> Result<CovCurves, AnalysisError> {
        let length = self.length;
        if maxl == 0 || maxl > length {
            return Err(AnalysisError::LagOutOfRange { maxl, length });
        }
        log::debug!(
            "Covariance over {} pairs, {} lags, genome length {}",
            self.pairs(),
            maxl,
            length
        );
        let pairs = self.pairs() as f64;
        let samples = pairs * length as f64;

        // Within-pair joint counts: sum_i sum_p x_i(p) x_i(p+l)
        let joint = self
            .diffs
            .par_iter()
            .fold(
                || (vec![0u64; maxl], vec![false; length]),
                |(mut counts, mut indicator), positions| {
                    for &p in positions {
                        indicator[p] = true;
                    }
                    for &p in positions {
                        for (l, count) in counts.iter_mut().enumerate() {
                            *count += u64::from(indicator[(p + l) % length]);
                        }
                    }
                    for &p in positions {
                        indicator[p] = false;
                    }
                    (counts, indicator)
                },
            )
            .map(|(counts, _)| counts)
            .reduce(
                || vec![0u64; maxl],
                |mut a, b| {
                    a.iter_mut().zip(b).for_each(|(x, y)| *x += y);
                    a
                },
            );

        // Number of pairs differing at each site
        let mut column = vec![0u64; length];
        for positions in &self.diffs {
            for &p in positions {
                column[p] += 1;
            }
        }
        let occupied: Vec<usize> = (0..length).filter(|&p| column[p] > 0).collect();
        let cross: Vec<u128> = (0..maxl)
            .into_par_iter()
            .map(|l| {
                occupied
                    .iter()
                    .map(|&p| u128::from(column[p] * column[(p + l) % length]))
                    .sum::<u128>()
            })
            .collect();

        let ks = self.ks();
        let xsys_value = self
            .diffs
            .iter()
            .map(|positions| {
                let m = positions.len() as f64 / length as f64;
                m * m
            })
            .sum::<f64>()
            / pairs;

        let xy: Vec<f64> = joint.iter().map(|&c| c as f64 / samples).collect();
        let xsys = vec![xsys_value; maxl];
        let smxy: Vec<f64> = cross
            .iter()
            .map(|&c| c as f64 / (length as f64 * pairs * pairs))
            .collect();
        let scov = xy.iter().zip(&xsys).map(|(a, b)| a - b).collect();
        let rcov = smxy.iter().map(|s| s - ks * ks).collect();

        Ok(CovCurves {
            scov,
            rcov,
            xy,
            xsys,
            smxy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn test_new_checks_pair_count() {
        assert_eq!(
            CMatrix::new(3, 10, vec![vec![], vec![]]),
            Err(AnalysisError::PairCountMismatch {
                expected: 3,
                found: 2
            })
        );
        assert!(CMatrix::new(3, 10, vec![vec![], vec![], vec![1]]).is_ok());
    }

    #[test]
    fn test_from_pairs_validation() {
        assert_eq!(CMatrix::from_pairs(0, vec![vec![]]), Err(AnalysisError::EmptyGenomeLength));
        assert_eq!(CMatrix::from_pairs(10, vec![]), Err(AnalysisError::NoPairs));
        assert_eq!(
            CMatrix::from_pairs(10, vec![vec![1, 2], vec![4, 3]]),
            Err(AnalysisError::UnsortedDifferences { pair: 1 })
        );
        assert_eq!(
            CMatrix::from_pairs(10, vec![vec![2, 2]]),
            Err(AnalysisError::UnsortedDifferences { pair: 0 })
        );
        assert_eq!(
            CMatrix::from_pairs(10, vec![vec![3, 10]]),
            Err(AnalysisError::PositionOutOfRange {
                pair: 0,
                position: 10,
                length: 10
            })
        );
    }

    #[test]
    fn test_d_identical_pairs() {
        let cm = CMatrix::new(3, 50, vec![vec![], vec![], vec![]]).unwrap();
        let stats = cm.d();
        assert_eq!(stats.ks, 0.0);
        assert_eq!(stats.var_d, VarianceEstimate::Estimated(0.0));
        assert_eq!(stats.pairs, 3);
    }

    #[test]
    fn test_d_single_pair() {
        let cm = CMatrix::new(2, 10, vec![vec![0, 5]]).unwrap();
        let stats = cm.d();
        assert_close(stats.ks, 0.2);
        assert_eq!(stats.var_d, VarianceEstimate::Undefined);
        assert_eq!(stats.var_d.value(), 0.0);
    }

    #[test]
    fn test_d_variance_across_pairs() {
        // m = 0.1, 0.2, 0.3
        let cm = CMatrix::new(3, 10, vec![vec![0], vec![0, 1], vec![0, 1, 2]]).unwrap();
        let stats = cm.d();
        assert_close(stats.ks, 0.2);
        assert_close(stats.var_d.value(), 0.01);
    }

    #[test]
    fn test_cov_circle_lag_range() {
        let cm = CMatrix::from_pairs(10, vec![vec![1]]).unwrap();
        assert_eq!(
            cm.cov_circle(0),
            Err(AnalysisError::LagOutOfRange { maxl: 0, length: 10 })
        );
        assert_eq!(
            cm.cov_circle(11),
            Err(AnalysisError::LagOutOfRange { maxl: 11, length: 10 })
        );
        assert_eq!(cm.cov_circle(10).unwrap().maxl(), 10);
    }

    #[test]
    fn test_cov_circle_single_block() {
        let length = 1000;
        let cm = CMatrix::from_pairs(length, vec![(200..300).collect()]).unwrap();
        let curves = cm.cov_circle(200).unwrap();

        for l in 0..200 {
            let expected_xy = if l < 100 { (100 - l) as f64 / 1000.0 } else { 0.0 };
            assert_close(curves.xy[l], expected_xy);
            assert_close(curves.xsys[l], 0.01);
            assert_close(curves.scov[l], expected_xy - 0.01);
        }
        let inside = curves.scov[..100].iter().cloned().fold(f64::INFINITY, f64::min);
        let outside = curves.scov[100..].iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!(inside > outside);
        // One pair: the pair average is the pair itself
        for l in 0..200 {
            assert_close(curves.smxy[l], curves.xy[l]);
            assert_close(curves.rcov[l], curves.scov[l]);
        }
    }

    #[test]
    fn test_cov_circle_wraps_around() {
        // Block spanning the end of the genome
        let cm = CMatrix::from_pairs(10, vec![vec![0, 1, 8, 9]]).unwrap();
        let curves = cm.cov_circle(5).unwrap();
        // Lag 1 pairs: (8,9), (9,0), (0,1) -> 3 of 10 sites
        assert_close(curves.xy[0], 0.4);
        assert_close(curves.xy[1], 0.3);
        assert_close(curves.xy[2], 0.2);
    }

    #[test]
    fn test_cov_circle_rotation_invariant() {
        let length = 97;
        let diffs = vec![
            vec![0, 3, 4, 5, 40, 96],
            vec![10, 11, 12],
            vec![5, 50, 51, 52, 53],
        ];
        let shift = 31;
        let rotated: Vec<Vec<usize>> = diffs
            .iter()
            .map(|d| {
                let mut r: Vec<usize> = d.iter().map(|p| (p + shift) % length).collect();
                r.sort_unstable();
                r
            })
            .collect();
        let a = CMatrix::new(3, length, diffs).unwrap().cov_circle(20).unwrap();
        let b = CMatrix::new(3, length, rotated).unwrap().cov_circle(20).unwrap();
        for l in 0..20 {
            assert_close(a.scov[l], b.scov[l]);
            assert_close(a.rcov[l], b.rcov[l]);
            assert_close(a.xy[l], b.xy[l]);
            assert_close(a.xsys[l], b.xsys[l]);
            assert_close(a.smxy[l], b.smxy[l]);
        }
    }

    #[test]
    fn test_cov_circle_cross_pair_term() {
        // Two pairs differing at the same single site
        let cm = CMatrix::from_pairs(4, vec![vec![1], vec![1]]).unwrap();
        let curves = cm.cov_circle(2).unwrap();
        // xbar = [0, 1, 0, 0]
        assert_close(curves.smxy[0], 0.25);
        assert_close(curves.smxy[1], 0.0);
        assert_close(curves.rcov[0], 0.25 - 0.0625);
        // Disjoint sites: no cross-pair overlap at lag 0 beyond each own site
        let cm = CMatrix::from_pairs(4, vec![vec![1], vec![2]]).unwrap();
        let curves = cm.cov_circle(2).unwrap();
        // xbar = [0, .5, .5, 0]
        assert_close(curves.smxy[0], 0.125);
        assert_close(curves.smxy[1], 0.0625);
    }

    #[test]
    fn test_from_genomes() {
        use hgtcov_sim::base::Alphabet;
        let genomes: Vec<Genome> = ["0000", "0101", "0001"]
            .iter()
            .map(|s| Genome::parse(s, Alphabet::Binary).unwrap())
            .collect();
        let cm = CMatrix::from_genomes(&genomes).unwrap();
        assert_eq!(cm.pairs(), 3);
        assert_eq!(cm.differences(), &[vec![1, 3], vec![3], vec![1]]);
        assert_close(cm.ks(), 4.0 / 12.0);
    }
}
