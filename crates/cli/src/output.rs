//! Plain-text CSV outputs.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use hgtcov_analysis::{CurveMoments, DiversityStats, VarianceEstimate};

/// Output file names derived from a prefix.
#[derive(Debug, Clone)]
pub struct OutputFiles {
    prefix: String,
}

impl OutputFiles {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn diversity(&self) -> PathBuf {
        self.path("d.csv")
    }

    pub fn covariances(&self) -> PathBuf {
        self.path("covs.csv")
    }

    pub fn trajectory(&self) -> PathBuf {
        self.path("ks.csv")
    }

    pub fn config(&self) -> PathBuf {
        self.path("config.json")
    }

    fn path(&self, suffix: &str) -> PathBuf {
        PathBuf::from(format!("{}_{suffix}", self.prefix))
    }
}

/// Row-oriented CSV writer over a buffered file.
pub struct CsvWriter {
    path: PathBuf,
    inner: BufWriter<File>,
}

impl CsvWriter {
    /// Create `path` and write the header row.
    pub fn create<S: AsRef<str>>(path: &Path, header: &[S]) -> Result<Self> {
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = Self {
            path: path.to_path_buf(),
            inner: BufWriter::new(file),
        };
        writer.write_row(header)?;
        Ok(writer)
    }

    pub fn write_row<S: AsRef<str>>(&mut self, fields: &[S]) -> Result<()> {
        let line = fields
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        writeln!(self.inner, "{line}")
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    pub fn finish(mut self) -> Result<()> {
        self.inner
            .flush()
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

/// Per-replicate (or per-snapshot) divergence rows: `<key>,ks,vd`.
pub struct DiversityWriter {
    csv: CsvWriter,
}

impl DiversityWriter {
    pub fn create(path: &Path, key: &str) -> Result<Self> {
        Ok(Self {
            csv: CsvWriter::create(path, &[key, "ks", "vd"])?,
        })
    }

    pub fn write(&mut self, key: u64, stats: &DiversityStats) -> Result<()> {
        self.csv.write_row(&[
            key.to_string(),
            stats.ks.to_string(),
            format_variance(stats.var_d),
        ])
    }

    pub fn finish(self) -> Result<()> {
        self.csv.finish()
    }
}

/// Undefined variances are written as `NA`.
pub fn format_variance(v: VarianceEstimate) -> String {
    match v.estimate() {
        Some(value) => value.to_string(),
        None => "NA".to_string(),
    }
}

const CURVES: [&str; 5] = ["scov", "rcov", "xy", "xsys", "smxy"];

/// Write lag-wise means and standard errors of the five curves.
pub fn write_curves(path: &Path, moments: &CurveMoments) -> Result<()> {
    let header: Vec<String> = std::iter::once("lag".to_string())
        .chain(CURVES.iter().map(|c| format!("{c}_mean")))
        .chain(CURVES.iter().map(|c| format!("{c}_se")))
        .collect();
    let mut csv = CsvWriter::create(path, &header)?;

    let means = moments.means();
    let errors = moments.standard_errors();
    for lag in 0..moments.maxl() {
        let row: Vec<String> = std::iter::once(lag.to_string())
            .chain(means.iter().map(|m| m[lag].to_string()))
            .chain(errors.iter().map(|e| e[lag].to_string()))
            .collect();
        csv.write_row(&row)?;
    }
    csv.finish()
}
