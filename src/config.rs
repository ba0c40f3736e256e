//! Pipeline settings loaded from an optional TOML file.

use crate::dataset::{DEFAULT_SEED, DEFAULT_TEST_FRACTION};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATASET: &str = "flight_delay_dataset.csv";

/// Startup settings for building the pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// CSV file holding the labeled flights.
    pub dataset: PathBuf,
    /// Share of rows held out for evaluation, in (0, 1).
    pub test_fraction: f64,
    /// Seed for the train/test shuffle.
    pub seed: u64,
    pub svm: SvmConfig,
}

/// Linear SVM parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SvmConfig {
    /// Penalty for misclassified training points (both classes).
    pub c: f64,
    /// Solver stopping tolerance.
    pub eps: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            dataset: PathBuf::from(DEFAULT_DATASET),
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
            svm: SvmConfig::default(),
        }
    }
}

impl Default for SvmConfig {
    fn default() -> Self {
        SvmConfig { c: 1.0, eps: 1e-7 }
    }
}

impl PipelineConfig {
    /// Reads a TOML config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PipelineConfig = toml::from_str(&data).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if !(self.svm.c > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "svm.c must be positive, got {}",
                self.svm.c
            )));
        }
        if !(self.svm.eps > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "svm.eps must be positive, got {}",
                self.svm.eps
            )));
        }
        Ok(())
    }
}
