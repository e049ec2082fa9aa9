use core::fmt;
use core::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Alphabet;
use crate::errors::GenomeError;

/// Split a circular window into at most two linear index ranges.
///
/// A window of `len` sites starting at `start` on a circular genome of
/// `length` sites wraps past the end when `start + len > length`. The second
/// range is empty when no wrap occurs. A window of `length` or more sites
/// covers the whole genome exactly once.
///
/// ```rust
/// # use hgtcov_sim::base::circular_ranges;
/// assert_eq!(circular_ranges(8, 4, 10), [8..10, 0..2]);
/// assert_eq!(circular_ranges(2, 3, 10), [2..5, 0..0]);
/// assert_eq!(circular_ranges(5, 20, 10), [0..10, 0..0]);
/// ```
#[inline]
pub fn circular_ranges(start: usize, len: usize, length: usize) -> [Range<usize>; 2] {
    if length == 0 {
        return [0..0, 0..0];
    }
    if len >= length {
        return [0..length, 0..0];
    }
    let start = start % length;
    let end = start + len;
    if end <= length {
        [start..end, 0..0]
    } else {
        [start..length, 0..end - length]
    }
}

/// Fixed-length circular genome of site states.
///
/// `Genome` stores one compact state index per site. The alphabet is not
/// stored alongside the states; callers validate against the alphabet the
/// population was built for (see [`Genome::is_valid`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genome(Vec<u8>);

impl Genome {
    /// Create a genome of `length` sites all set to `state`.
    pub fn uniform(length: usize, state: u8) -> Self {
        Self(vec![state; length])
    }

    /// Create a genome with every site drawn uniformly from the alphabet.
    pub fn random<R: Rng + ?Sized>(length: usize, alphabet: Alphabet, rng: &mut R) -> Self {
        Self((0..length).map(|_| alphabet.random_state(rng)).collect())
    }

    /// Create a genome from raw state indices, rejecting states outside the alphabet.
    pub fn from_states(states: Vec<u8>, alphabet: Alphabet) -> Result<Self, GenomeError> {
        if let Some(&state) = states.iter().find(|&&s| !alphabet.contains(s)) {
            return Err(GenomeError::InvalidState {
                state,
                size: alphabet.size(),
            });
        }
        Ok(Self(states))
    }

    /// Parse a genome from its rendered symbols.
    ///
    /// ```rust
    /// # use hgtcov_sim::base::{Alphabet, Genome};
    /// let genome = Genome::parse("ACGT", Alphabet::Dna).unwrap();
    /// assert_eq!(genome.as_slice(), &[0, 1, 2, 3]);
    /// ```
    pub fn parse(text: &str, alphabet: Alphabet) -> Result<Self, GenomeError> {
        text.chars()
            .map(|c| alphabet.state(c).ok_or(GenomeError::InvalidSymbol(c)))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Number of sites.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` if the genome has no sites.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// State at `index`, or `None` if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }

    /// Set the state at `index`.
    #[inline]
    pub fn set(&mut self, index: usize, state: u8) -> Result<(), GenomeError> {
        let len = self.len();
        self.0
            .get_mut(index)
            .map(|slot| *slot = state)
            .ok_or(GenomeError::OutOfBounds { index, len })
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }

    /// Return `true` if every state belongs to `alphabet`.
    pub fn is_valid(&self, alphabet: Alphabet) -> bool {
        self.0.iter().all(|&s| alphabet.contains(s))
    }

    /// Sorted positions at which `self` and `other` differ.
    pub fn differences(&self, other: &Genome) -> Result<Vec<usize>, GenomeError> {
        self.check_length(other)?;
        Ok(self
            .0
            .iter()
            .zip(&other.0)
            .enumerate()
            .filter_map(|(i, (a, b))| (a != b).then_some(i))
            .collect())
    }

    /// Number of differing sites.
    pub fn hamming(&self, other: &Genome) -> Result<usize, GenomeError> {
        self.check_length(other)?;
        Ok(self.0.iter().zip(&other.0).filter(|(a, b)| a != b).count())
    }

    /// Overwrite a circular window of this genome with the donor's states.
    ///
    /// Sites outside the window are untouched. A window of at least the genome
    /// length replaces the whole genome.
    pub fn copy_window_from(
        &mut self,
        donor: &Genome,
        start: usize,
        len: usize,
    ) -> Result<(), GenomeError> {
        self.check_length(donor)?;
        let length = self.len();
        if length > 0 && start >= length {
            return Err(GenomeError::OutOfBounds { index: start, len: length });
        }
        for range in circular_ranges(start, len, length) {
            self.0[range.clone()].copy_from_slice(&donor.0[range]);
        }
        Ok(())
    }

    /// Copy of this genome rotated left by `offset` sites.
    pub fn rotated(&self, offset: usize) -> Self {
        let mut states = self.0.clone();
        if !states.is_empty() {
            states.rotate_left(offset % self.len());
        }
        Self(states)
    }

    /// Render the genome with the alphabet's symbols. Invalid states render as `?`.
    pub fn render(&self, alphabet: Alphabet) -> String {
        self.0
            .iter()
            .map(|&s| alphabet.symbol(s).unwrap_or('?'))
            .collect()
    }

    fn check_length(&self, other: &Genome) -> Result<(), GenomeError> {
        if self.len() != other.len() {
            return Err(GenomeError::LengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(())
    }
}

impl From<Genome> for Vec<u8> {
    fn from(genome: Genome) -> Self {
        genome.0
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &s in &self.0 {
            write!(f, "{s}")?;
        }
        Ok(())
    }
}
