//! Running moments for aggregating replicate statistics.
//!
//! All accumulators use Welford's online update, so the order in which
//! values arrive only affects floating-point rounding.

use serde::{Deserialize, Serialize};

use crate::cmatrix::{CovCurves, DiversityStats};
use crate::errors::AnalysisError;

/// A variance that may not be estimable from the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceEstimate {
    /// Bias-corrected estimate from at least two observations.
    Estimated(f64),
    /// Fewer than two observations.
    Undefined,
}

impl VarianceEstimate {
    /// Numeric value, with `Undefined` reported as 0.
    pub fn value(&self) -> f64 {
        match *self {
            Self::Estimated(v) => v,
            Self::Undefined => 0.0,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Estimated(_))
    }

    pub fn estimate(&self) -> Option<f64> {
        match *self {
            Self::Estimated(v) => Some(v),
            Self::Undefined => None,
        }
    }
}

/// Running arithmetic mean.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mean {
    n: u64,
    mean: f64,
}

impl Mean {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, x: f64) {
        self.n += 1;
        self.mean += (x - self.mean) / self.n as f64;
    }

    pub fn count(&self) -> u64 {
        self.n
    }

    /// Mean of the values seen so far, 0 when empty.
    pub fn result(&self) -> f64 {
        self.mean
    }
}

/// Running bias-corrected variance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Variance {
    n: u64,
    mean: f64,
    m2: f64,
}

impl Variance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, x: f64) {
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (x - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.n
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance with the `n - 1` denominator.
    pub fn result(&self) -> VarianceEstimate {
        if self.n < 2 {
            VarianceEstimate::Undefined
        } else {
            VarianceEstimate::Estimated(self.m2 / (self.n - 1) as f64)
        }
    }
}

/// Mean and bias-corrected standard deviation of a stream of values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
    variance: Variance,
}

impl Moments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, x: f64) {
        self.variance.increment(x);
    }

    pub fn count(&self) -> u64 {
        self.variance.count()
    }

    pub fn mean(&self) -> f64 {
        self.variance.mean()
    }

    pub fn variance(&self) -> VarianceEstimate {
        self.variance.result()
    }

    /// Standard deviation; 0 with fewer than two values.
    pub fn sd(&self) -> f64 {
        self.variance.result().value().sqrt()
    }

    /// Standard error of the mean, `sd / sqrt(n)`.
    pub fn standard_error(&self) -> f64 {
        if self.count() == 0 {
            return 0.0;
        }
        self.sd() / (self.count() as f64).sqrt()
    }
}

/// Aggregate of per-replicate divergence statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DiversityMoments {
    pub ks: Moments,
    /// Only replicates with an estimable VarD contribute
    pub var_d: Moments,
}

impl DiversityMoments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, stats: &DiversityStats) {
        self.ks.increment(stats.ks);
        if let Some(v) = stats.var_d.estimate() {
            self.var_d.increment(v);
        }
    }
}

/// Lag-wise aggregate of the five covariance curves.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveMoments {
    pub scov: Vec<Moments>,
    pub rcov: Vec<Moments>,
    pub xy: Vec<Moments>,
    pub xsys: Vec<Moments>,
    pub smxy: Vec<Moments>,
}

impl CurveMoments {
    pub fn new(maxl: usize) -> Self {
        Self {
            scov: vec![Moments::new(); maxl],
            rcov: vec![Moments::new(); maxl],
            xy: vec![Moments::new(); maxl],
            xsys: vec![Moments::new(); maxl],
            smxy: vec![Moments::new(); maxl],
        }
    }

    pub fn maxl(&self) -> usize {
        self.scov.len()
    }

    /// Number of curve sets aggregated so far.
    pub fn count(&self) -> u64 {
        self.scov.first().map_or(0, Moments::count)
    }

    pub fn increment(&mut self, curves: &CovCurves) -> Result<(), AnalysisError> {
        if curves.maxl() != self.maxl() {
            return Err(AnalysisError::LengthMismatch {
                expected: self.maxl(),
                found: curves.maxl(),
            });
        }
        let pairs = [
            (&mut self.scov, &curves.scov),
            (&mut self.rcov, &curves.rcov),
            (&mut self.xy, &curves.xy),
            (&mut self.xsys, &curves.xsys),
            (&mut self.smxy, &curves.smxy),
        ];
        for (moments, values) in pairs {
            for (m, &v) in moments.iter_mut().zip(values) {
                m.increment(v);
            }
        }
        Ok(())
    }

    /// Lag-wise means in the order `scov, rcov, xy, xsys, smxy`.
    pub fn means(&self) -> [Vec<f64>; 5] {
        self.curves().map(|c| c.iter().map(Moments::mean).collect())
    }

    /// Lag-wise standard errors in the order `scov, rcov, xy, xsys, smxy`.
    pub fn standard_errors(&self) -> [Vec<f64>; 5] {
        self.curves()
            .map(|c| c.iter().map(Moments::standard_error).collect())
    }

    fn curves(&self) -> [&Vec<Moments>; 5] {
        [&self.scov, &self.rcov, &self.xy, &self.xsys, &self.smxy]
    }
}
