use crate::errors::{IsingError, Result};
use crate::lattice::square_lattice::SquareLattice;
use crate::monte_carlo::metropolis::Temperature;
use crate::monte_carlo::temperature_scan::ScanSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the lattice is filled before the first sweep.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum InitialState {
    /// Independent fair coin per site.
    #[default]
    Random,
    /// Every spin +1.
    AllUp,
    /// +1 where row + column is even, -1 elsewhere.
    Checkerboard,
}

impl InitialState {
    pub fn build<R: rand::Rng + ?Sized>(
        &self,
        width: usize,
        rng: &mut R,
    ) -> Result<SquareLattice> {
        match self {
            InitialState::Random => SquareLattice::new(width, rng),
            InitialState::AllUp => SquareLattice::new_with_ones(width),
            InitialState::Checkerboard => SquareLattice::checkerboard(width),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    #[serde(default = "default_lattice_size")]
    pub lattice_size: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_sweeps")]
    pub sweeps: u64,
    /// Defaults to lattice_size^2.
    #[serde(default)]
    pub steps_per_sweep: Option<u64>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub initial_state: InitialState,
    #[serde(default = "default_burn_in_sweeps")]
    pub burn_in_sweeps: u64,
    #[serde(default = "default_sample_interval")]
    pub sample_interval: u64,
    /// When non-empty, one replica per temperature is sampled instead of a single run.
    #[serde(default)]
    pub scan_temperatures: Vec<f64>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_lattice_size() -> usize {
    100
}
fn default_temperature() -> f64 {
    2.3
}
fn default_sweeps() -> u64 {
    1000
}
fn default_burn_in_sweeps() -> u64 {
    200
}
fn default_sample_interval() -> u64 {
    1
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            lattice_size: default_lattice_size(),
            temperature: default_temperature(),
            sweeps: default_sweeps(),
            steps_per_sweep: None,
            seed: None,
            initial_state: InitialState::default(),
            burn_in_sweeps: default_burn_in_sweeps(),
            sample_interval: default_sample_interval(),
            scan_temperatures: Vec::new(),
            log_level: default_log_level(),
        }
    }
}

impl SimulationConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| IsingError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    pub fn from_toml_str(content: &str, source_path: &Path) -> Result<Self> {
        let config: SimulationConfig =
            toml::from_str(content).map_err(|source| IsingError::ConfigParse {
                path: source_path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Fail fast on anything that would make the run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.lattice_size < 2 {
            return Err(IsingError::LatticeTooSmall(self.lattice_size));
        }
        Temperature::new(self.temperature)?;
        for t in &self.scan_temperatures {
            Temperature::new(*t)?;
        }
        if !self.scan_temperatures.is_empty() && self.sweeps < self.sample_interval.max(1) {
            return Err(IsingError::NoSamples);
        }
        Ok(())
    }

    pub fn get_temperature(&self) -> Result<Temperature> {
        Temperature::new(self.temperature)
    }

    pub fn get_steps_per_sweep(&self) -> u64 {
        self.steps_per_sweep
            .unwrap_or((self.lattice_size as u64).saturating_mul(self.lattice_size as u64))
    }

    /// Sampling settings for a temperature scan; `sweeps` sweeps are sampled after burn in.
    pub fn get_scan_settings(&self) -> ScanSettings {
        let interval = self.sample_interval.max(1);
        ScanSettings::new(self.burn_in_sweeps, interval, self.sweeps / interval)
    }
}
