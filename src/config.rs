//! Settings: built-in defaults + optional TOML config.
//!
//! - `Settings::default()` → built-in tolerances, sample count and sweep grids
//! - `Settings::from_toml_file(path)` → load a user file (missing keys keep defaults)
//! - `Settings::load(cli_path)` → `--config FILE`, else ~/.guardband/config.toml if present

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::analytic::{AnalyticEvaluator, DEFAULT_MAX_RELATIVE_ERROR};
use crate::core::montecarlo::{MonteCarloEvaluator, DEFAULT_SAMPLE_COUNT};
use crate::core::quadrature::{Tolerance, DEFAULT_EPSABS, DEFAULT_EPSREL, DEFAULT_LIMIT};
use crate::core::sweep::Grid;
use crate::core::EvalError;

pub fn default_config_path() -> Option<PathBuf> {
    // ~/.guardband/config.toml
    dirs_next::home_dir().map(|h| h.join(".guardband").join("config.toml"))
}

pub fn resolve_config_path(cli_path: &Option<PathBuf>) -> Option<PathBuf> {
    if let Some(p) = cli_path {
        return Some(p.clone());
    }
    default_config_path()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntegrationSettings {
    pub epsabs: f64,
    pub epsrel: f64,
    pub limit: usize,
    pub max_relative_error: f64,
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        Self {
            epsabs: DEFAULT_EPSABS,
            epsrel: DEFAULT_EPSREL,
            limit: DEFAULT_LIMIT,
            max_relative_error: DEFAULT_MAX_RELATIVE_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonteCarloSettings {
    pub sample_count: u64,
    pub seed: u64,
}

impl Default for MonteCarloSettings {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepSettings {
    pub sigma_x: f64,
    pub mu_x: f64,
    pub beta: Grid,
    pub sigma_noise: Grid,
    /// Output file for `sweep` when `-o` is not given.
    pub output: Option<PathBuf>,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            sigma_x: 1.0,
            mu_x: 0.0,
            beta: Grid::new(0.0, 0.5, 20),
            sigma_noise: Grid::new(0.01, 0.3, 20),
            output: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub integration: IntegrationSettings,
    pub montecarlo: MonteCarloSettings,
    pub sweep: SweepSettings,
}

impl Settings {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("Parse guardband TOML")
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)
            .with_context(|| format!("Read config {}", path.display()))?;
        Self::from_toml_str(&s).with_context(|| format!("Load config {}", path.display()))
    }

    /// An explicit path must exist; the default location is optional.
    pub fn load(cli_path: &Option<PathBuf>) -> Result<Self> {
        if let Some(p) = cli_path {
            return Self::from_toml_file(p);
        }
        match default_config_path() {
            Some(p) if p.exists() => Self::from_toml_file(&p),
            _ => Ok(Self::default()),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Serialize settings")
    }

    pub fn analytic(&self) -> AnalyticEvaluator {
        AnalyticEvaluator::new(
            Tolerance {
                epsabs: self.integration.epsabs,
                epsrel: self.integration.epsrel,
                limit: self.integration.limit,
            },
            self.integration.max_relative_error,
        )
    }

    pub fn montecarlo(&self) -> Result<MonteCarloEvaluator, EvalError> {
        MonteCarloEvaluator::new(self.montecarlo.sample_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let s = Settings::from_toml_str(
            r#"
            [montecarlo]
            seed = 7

            [sweep]
            beta = { min = 0.0, max = 1.5, count = 50 }
            "#,
        )
        .unwrap();
        assert_eq!(s.montecarlo.seed, 7);
        assert_eq!(s.montecarlo.sample_count, DEFAULT_SAMPLE_COUNT);
        assert_eq!(s.sweep.beta, Grid::new(0.0, 1.5, 50));
        assert_eq!(s.sweep.sigma_noise, SweepSettings::default().sigma_noise);
        assert_eq!(s.integration, IntegrationSettings::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::from_toml_str("[integration]\nepsilon = 1.0\n").is_err());
    }

    #[test]
    fn round_trips_through_toml() {
        let s = Settings::default();
        let back = Settings::from_toml_str(&s.to_toml_string().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Some(dir.path().join("nope.toml"));
        assert!(Settings::load(&missing).is_err());
    }

    #[test]
    fn builds_evaluators() {
        let mut s = Settings::default();
        s.integration.limit = 12;
        assert_eq!(s.analytic().tolerance.limit, 12);
        s.montecarlo.sample_count = 0;
        assert!(s.montecarlo().is_err());
    }
}
