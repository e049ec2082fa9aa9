//! Resolved run configurations.
//!
//! Each subcommand turns its flags (or a `--config` JSON file) into one of
//! these values. The value is echoed to `<prefix>_config.json` with the seed
//! filled in, so a run can be repeated exactly with `--config`.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use hgtcov_sim::prelude::*;

use crate::args::{CoalescentArgs, ForwardArgs, TrajectoryArgs};
use crate::defaults;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardRun {
    pub population: PopulationParams,
    #[serde(default)]
    pub initialization: Initialization,
    pub generations: u64,
    pub sample: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pairs: Option<usize>,
    pub replicates: usize,
    pub maxl: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoalescentRun {
    pub params: CoalescentParams,
    pub replicates: usize,
    pub maxl: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryRun {
    pub population: PopulationParams,
    #[serde(default)]
    pub initialization: Initialization,
    pub generations: u64,
    pub step: u64,
    pub sample: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pairs: Option<usize>,
    pub maxl: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ForwardRun {
    pub fn from_args(args: &ForwardArgs) -> Result<Self> {
        if let Some(path) = &args.output.config {
            return load(path);
        }
        Ok(Self {
            population: args.model.resolve(&defaults::FORWARD),
            initialization: Initialization::Clonal,
            generations: args.generations,
            sample: args.sample,
            pairs: args.pairs,
            replicates: args.reps,
            maxl: args.output.maxl,
            seed: args.output.seed,
        })
    }
}

impl CoalescentRun {
    pub fn from_args(args: &CoalescentArgs) -> Result<Self> {
        if let Some(path) = &args.output.config {
            return load(path);
        }
        let mut params = CoalescentParams::new(
            args.model.resolve(&defaults::COALESCENT),
            args.sample,
        );
        params.generation_cap = args.cap;
        Ok(Self {
            params,
            replicates: args.reps,
            maxl: args.output.maxl,
            seed: args.output.seed,
        })
    }
}

impl TrajectoryRun {
    pub fn from_args(args: &TrajectoryArgs) -> Result<Self> {
        if let Some(path) = &args.output.config {
            return load(path);
        }
        Ok(Self {
            population: args.model.resolve(&defaults::FORWARD),
            initialization: Initialization::Clonal,
            generations: args.generations,
            step: args.step,
            sample: args.sample,
            pairs: args.pairs,
            maxl: args.output.maxl,
            seed: args.output.seed,
        })
    }
}

/// Number of covariance lags actually computed.
///
/// Curves must reach past twice the fragment length to show the decay of
/// transferred blocks, so shorter requests are raised to `2F`, capped at `L`.
pub fn effective_maxl(maxl: usize, fragment: usize, length: usize) -> usize {
    let wanted = fragment.saturating_mul(2);
    if maxl >= wanted {
        return maxl;
    }
    let raised = wanted.min(length);
    if raised > maxl {
        log::info!("Raising maxl from {maxl} to {raised} (twice the fragment length)");
        raised
    } else {
        maxl
    }
}

pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open config file {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

pub fn save<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_effective_maxl() {
        assert_eq!(effective_maxl(300, 100, 1000), 300);
        assert_eq!(effective_maxl(200, 100, 1000), 200);
        assert_eq!(effective_maxl(50, 100, 1000), 200);
        assert_eq!(effective_maxl(50, 100, 150), 150);
        assert_eq!(effective_maxl(10, 0, 1000), 10);
    }

    #[test]
    fn test_config_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.json");
        let run = CoalescentRun {
            params: CoalescentParams::new(PopulationParams::new(50, 200), 4),
            replicates: 3,
            maxl: 20,
            seed: Some(9),
        };
        save(&run, &path).unwrap();

        let loaded: CoalescentRun = load(&path).unwrap();
        assert_eq!(loaded.params, run.params);
        assert_eq!(loaded.seed, Some(9));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load::<ForwardRun>(Path::new("/nonexistent/run.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to open config file"));
    }
}
