//! Persisted per-run optimization logs.
//!
//! One YAML file per run, keyed by run name. The payload is a mapping from
//! metric name to an ordered series; "Energy" carries the iteration indices,
//! mean energy (real and imaginary parts), and local-energy variance.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::VmcError;

/// Ordered per-iteration statistics for one metric.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct EnergySeries {
    pub iters: Vec<usize>,
    pub mean: Vec<f64>,
    pub imag: Vec<f64>,
    pub variance: Vec<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Metrics {
    #[serde(rename = "Energy")]
    pub energy: EnergySeries,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunLog {
    pub run_name: String,
    pub metrics: Metrics,
}

impl RunLog {
    pub fn new(run_name: impl Into<String>) -> Self {
        Self {
            run_name: run_name.into(),
            metrics: Metrics::default(),
        }
    }

    /// Append one iteration record; ordering follows call order.
    pub fn append(&mut self, iteration: usize, mean: f64, imag: f64, variance: f64) {
        let energy = &mut self.metrics.energy;
        energy.iters.push(iteration);
        energy.mean.push(mean);
        energy.imag.push(imag);
        energy.variance.push(variance);
    }

    pub fn energy(&self) -> &EnergySeries {
        &self.metrics.energy
    }

    pub fn len(&self) -> usize {
        self.metrics.energy.iters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mean energy of the last recorded iteration.
    pub fn final_energy(&self) -> Option<f64> {
        self.metrics.energy.mean.last().copied()
    }

    pub fn path_in(dir: &Path, run_name: &str) -> PathBuf {
        dir.join(format!("{}.yml", run_name))
    }

    /// Write the log under `dir`, creating the directory if needed.
    pub fn write(&self, dir: &Path) -> Result<PathBuf, VmcError> {
        std::fs::create_dir_all(dir)?;
        let path = Self::path_in(dir, &self.run_name);
        let file = File::create(&path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(path)
    }

    /// Reload a named run log from `dir`.
    pub fn read(dir: &Path, run_name: &str) -> Result<Self, VmcError> {
        let path = Self::path_in(dir, run_name);
        if !path.exists() {
            return Err(VmcError::MissingLog(run_name.to_string()));
        }
        let reader = BufReader::new(File::open(&path)?);
        Ok(serde_yaml::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("spin_vmc_log_{}_{}", std::process::id(), tag))
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let dir = scratch_dir("roundtrip");
        let mut log = RunLog::new("rbm");
        for i in 0..10 {
            log.append(i, -1.0 - i as f64, 1e-3 * i as f64, 0.5 / (i + 1) as f64);
        }
        log.write(&dir).unwrap();
        let reloaded = RunLog::read(&dir, "rbm").unwrap();
        assert_eq!(reloaded, log);
        assert_eq!(reloaded.energy().iters, (0..10).collect::<Vec<_>>());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_log_is_an_error() {
        let dir = scratch_dir("missing");
        let err = RunLog::read(&dir, "nope").unwrap_err();
        assert!(matches!(err, VmcError::MissingLog(_)));
    }

    #[test]
    fn test_final_energy() {
        let mut log = RunLog::new("jastrow");
        assert!(log.final_energy().is_none());
        log.append(0, -3.0, 0.0, 1.0);
        log.append(1, -5.5, 0.0, 0.4);
        assert_eq!(log.final_energy(), Some(-5.5));
    }
}
