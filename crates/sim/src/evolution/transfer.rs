//! Horizontal transfer of genome fragments.
//!
//! A transfer event overwrites a circular window of `fragment` sites of the
//! recipient with the homologous sites of a donor. Windows that run past the
//! end of the genome wrap to the start; a fragment of at least the genome
//! length replaces the whole genome.

use serde::{Deserialize, Serialize};

use super::mutation::validate_probability;
use crate::base::Genome;
use crate::errors::{ConfigError, GenomeError};

/// Unit in which the transfer rate is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransferUnit {
    /// Rate of transfer initiation per site per generation.
    #[default]
    PerSite,
    /// Probability that an offspring receives a transfer in a generation.
    PerGenome,
}

/// Fixed-length block transfer process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferModel {
    rate: f64,
    fragment: usize,
    unit: TransferUnit,
}

impl TransferModel {
    pub fn new(rate: f64, fragment: usize, unit: TransferUnit) -> Result<Self, ConfigError> {
        validate_probability("transfer rate", rate)?;
        Ok(Self {
            rate,
            fragment,
            unit,
        })
    }

    /// Model with transfer switched off.
    pub fn none() -> Self {
        Self {
            rate: 0.0,
            fragment: 0,
            unit: TransferUnit::PerSite,
        }
    }

    #[inline(always)]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    #[inline(always)]
    pub fn fragment(&self) -> usize {
        self.fragment
    }

    #[inline(always)]
    pub fn unit(&self) -> TransferUnit {
        self.unit
    }

    /// Return `true` if transfer events can happen at all.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.rate > 0.0 && self.fragment > 0
    }

    /// Probability that one genome of `genome_length` sites receives a
    /// transfer in one generation.
    ///
    /// For [`TransferUnit::PerSite`] this is `1 - (1 - rate)^L`, computed in
    /// log space so tiny rates on long genomes keep their precision.
    pub fn event_probability(&self, genome_length: usize) -> f64 {
        if !self.is_active() || genome_length == 0 {
            return 0.0;
        }
        match self.unit {
            TransferUnit::PerGenome => self.rate,
            TransferUnit::PerSite => {
                if self.rate >= 1.0 {
                    return 1.0;
                }
                -((genome_length as f64) * (-self.rate).ln_1p()).exp_m1()
            }
        }
    }

    /// Copy the donor's window starting at `start` into `recipient`.
    pub fn apply(
        &self,
        recipient: &mut Genome,
        donor: &Genome,
        start: usize,
    ) -> Result<(), GenomeError> {
        if self.fragment == 0 {
            return Ok(());
        }
        recipient.copy_window_from(donor, start, self.fragment)
    }
}

impl Default for TransferModel {
    fn default() -> Self {
        Self::none()
    }
}
