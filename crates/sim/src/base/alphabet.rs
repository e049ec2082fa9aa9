use core::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Closed alphabet of site states.
///
/// Site states are stored as compact `u8` indices in `0..size()`. The DNA
/// mapping is stable and used throughout the crate (A=0, C=1, G=2, T=3), so
/// transitions (A<->G, C<->T) are exactly the pairs whose indices differ by 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alphabet {
    /// Two states, rendered as `0` and `1`.
    Binary,
    /// Four nucleotide states, rendered as `A`, `C`, `G`, `T`.
    #[default]
    Dna,
}

const BINARY_SYMBOLS: [char; 2] = ['0', '1'];
const DNA_SYMBOLS: [char; 4] = ['A', 'C', 'G', 'T'];

impl Alphabet {
    /// Build an alphabet from its number of states.
    pub fn from_size(size: usize) -> Result<Self, ConfigError> {
        match size {
            2 => Ok(Self::Binary),
            4 => Ok(Self::Dna),
            other => Err(ConfigError::UnsupportedAlphabet(other)),
        }
    }

    /// Number of states in this alphabet.
    #[inline(always)]
    pub const fn size(self) -> usize {
        match self {
            Self::Binary => 2,
            Self::Dna => 4,
        }
    }

    /// Return true if `state` is a valid index for this alphabet.
    #[inline(always)]
    pub const fn contains(self, state: u8) -> bool {
        (state as usize) < self.size()
    }

    /// Rendering symbols, ordered by state index.
    pub const fn symbols(self) -> &'static [char] {
        match self {
            Self::Binary => &BINARY_SYMBOLS,
            Self::Dna => &DNA_SYMBOLS,
        }
    }

    /// Symbol for a state, or `None` if the state is outside the alphabet.
    #[inline]
    pub fn symbol(self, state: u8) -> Option<char> {
        self.symbols().get(state as usize).copied()
    }

    /// State index for a symbol. DNA symbols are accepted in either case.
    pub fn state(self, symbol: char) -> Option<u8> {
        let symbol = symbol.to_ascii_uppercase();
        self.symbols()
            .iter()
            .position(|&c| c == symbol)
            .map(|i| i as u8)
    }

    /// Draw a state uniformly from the alphabet.
    #[inline]
    pub fn random_state<R: Rng + ?Sized>(self, rng: &mut R) -> u8 {
        rng.random_range(0..self.size() as u8)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => write!(f, "binary"),
            Self::Dna => write!(f, "dna"),
        }
    }
}

impl FromStr for Alphabet {
    type Err = ConfigError;

    /// Parse `binary`/`2` or `dna`/`4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binary" | "2" => Ok(Self::Binary),
            "dna" | "4" => Ok(Self::Dna),
            other => Err(ConfigError::UnsupportedAlphabet(
                other.parse::<usize>().unwrap_or(0),
            )),
        }
    }
}
