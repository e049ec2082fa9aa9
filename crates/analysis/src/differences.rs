//! Pairwise difference sets.
//!
//! A difference set is the ascending list of site positions at which two
//! genomes carry different states.

use hgtcov_sim::base::Genome;
use rand::seq::index;
use rand::Rng;
use rayon::prelude::*;

use crate::errors::AnalysisError;

/// Positions at which `a` and `b` differ.
pub fn pair_differences(a: &Genome, b: &Genome) -> Result<Vec<usize>, AnalysisError> {
    Ok(a.differences(b)?)
}

/// Difference sets of every pair `i < j`, in row-major order
/// `(0,1), (0,2), ..., (1,2), ...`.
///
/// Pairs are compared in parallel; the output order does not depend on the
/// thread count.
///
/// # Examples
///
/// ```
/// use hgtcov_analysis::pairwise_differences;
/// use hgtcov_sim::base::{Alphabet, Genome};
///
/// let genomes = ["0000", "0100", "0110"]
///     .iter()
///     .map(|s| Genome::parse(s, Alphabet::Binary).unwrap())
///     .collect::<Vec<_>>();
/// let diffs = pairwise_differences(&genomes).unwrap();
/// assert_eq!(diffs, vec![vec![1], vec![1, 2], vec![2]]);
/// ```
pub fn pairwise_differences(genomes: &[Genome]) -> Result<Vec<Vec<usize>>, AnalysisError> {
    check_genomes(genomes)?;
    let n = genomes.len();
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .collect();

    pairs
        .par_iter()
        .map(|&(i, j)| pair_differences(&genomes[i], &genomes[j]))
        .collect()
}

/// Difference sets of `count` random pairs of distinct genomes.
///
/// Pairs are drawn independently, so the same pair may appear more than once.
pub fn random_pair_differences<R: Rng + ?Sized>(
    genomes: &[Genome],
    count: usize,
    rng: &mut R,
) -> Result<Vec<Vec<usize>>, AnalysisError> {
    check_genomes(genomes)?;
    if count == 0 {
        return Err(AnalysisError::NoPairs);
    }
    let pairs: Vec<(usize, usize)> = (0..count)
        .map(|_| {
            let pick = index::sample(rng, genomes.len(), 2);
            (pick.index(0), pick.index(1))
        })
        .collect();

    pairs
        .par_iter()
        .map(|&(i, j)| pair_differences(&genomes[i], &genomes[j]))
        .collect()
}

fn check_genomes(genomes: &[Genome]) -> Result<(), AnalysisError> {
    if genomes.len() < 2 {
        return Err(AnalysisError::TooFewGenomes(genomes.len()));
    }
    let length = genomes[0].len();
    if let Some(other) = genomes.iter().find(|g| g.len() != length) {
        return Err(AnalysisError::LengthMismatch {
            expected: length,
            found: other.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hgtcov_sim::base::Alphabet;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn genomes(texts: &[&str]) -> Vec<Genome> {
        texts
            .iter()
            .map(|s| Genome::parse(s, Alphabet::Dna).unwrap())
            .collect()
    }

    #[test]
    fn test_pair_differences() {
        let g = genomes(&["ACGTACGTAC", "CCGTAAGTAC"]);
        assert_eq!(pair_differences(&g[0], &g[1]).unwrap(), vec![0, 5]);
        assert!(pair_differences(&g[0], &g[0]).unwrap().is_empty());
    }

    #[test]
    fn test_pairwise_differences_order() {
        let g = genomes(&["AAAA", "CAAA", "ACAA", "AACA"]);
        let diffs = pairwise_differences(&g).unwrap();
        assert_eq!(
            diffs,
            vec![
                vec![0],    // (0,1)
                vec![1],    // (0,2)
                vec![2],    // (0,3)
                vec![0, 1], // (1,2)
                vec![0, 2], // (1,3)
                vec![1, 2], // (2,3)
            ]
        );
    }

    #[test]
    fn test_pairwise_differences_errors() {
        let g = genomes(&["AAAA"]);
        assert_eq!(pairwise_differences(&g), Err(AnalysisError::TooFewGenomes(1)));

        let g = genomes(&["AAAA", "AAA"]);
        assert_eq!(
            pairwise_differences(&g),
            Err(AnalysisError::LengthMismatch {
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn test_random_pair_differences() {
        let g = genomes(&["AAAA", "CAAA", "CCAA"]);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let diffs = random_pair_differences(&g, 50, &mut rng).unwrap();
        assert_eq!(diffs.len(), 50);
        // Distinct genomes always differ somewhere
        assert!(diffs.iter().all(|d| !d.is_empty()));
        assert_eq!(
            random_pair_differences(&g, 0, &mut rng),
            Err(AnalysisError::NoPairs)
        );
    }
}
