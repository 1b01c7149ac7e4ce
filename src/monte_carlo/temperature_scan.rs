use crate::config::InitialState;
use crate::errors::{IsingError, Result};
use crate::lattice::square_lattice::SquareLattice;
use crate::monte_carlo::mc_results::MonteCarloResult;
use crate::monte_carlo::metropolis::{MetropolisSampler, Temperature};
use crate::monte_carlo::observables::SampleRecorder;
use crate::monte_carlo::sweep::{run_sweeps, SweepSchedule};
use crate::random::RandomSource;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanSettings {
    burn_in_sweeps: u64,
    sweeps_between_samples: u64,
    samples_per_temperature: u64,
}

impl ScanSettings {
    pub fn new(
        burn_in_sweeps: u64,
        sweeps_between_samples: u64,
        samples_per_temperature: u64,
    ) -> Self {
        ScanSettings {
            burn_in_sweeps,
            sweeps_between_samples: sweeps_between_samples.max(1),
            samples_per_temperature,
        }
    }

    pub fn get_burn_in_sweeps(&self) -> u64 {
        self.burn_in_sweeps
    }

    pub fn get_sweeps_between_samples(&self) -> u64 {
        self.sweeps_between_samples
    }

    pub fn get_samples_per_temperature(&self) -> u64 {
        self.samples_per_temperature
    }

    pub fn total_sweeps(&self) -> u64 {
        self.burn_in_sweeps + self.sweeps_between_samples * self.samples_per_temperature
    }
}

/// Seed of replica `index`; replicas never share a random stream.
fn replica_seed(base_seed: Option<u64>, index: usize) -> Option<u64> {
    base_seed.map(|seed| seed.wrapping_add(index as u64))
}

fn run_replica(
    width: usize,
    temperature: Temperature,
    settings: &ScanSettings,
    initial_state: InitialState,
    seed: Option<u64>,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let mut rng = RandomSource::new(seed)?;
    let mut lattice = initial_state.build(width, &mut rng)?;
    let sampler = MetropolisSampler::new(temperature);
    let mut recorder = SampleRecorder::new(
        settings.get_burn_in_sweeps(),
        settings.get_sweeps_between_samples(),
    );

    let schedule = SweepSchedule::for_lattice(settings.total_sweeps(), &lattice);
    let summary = run_sweeps(
        &mut lattice,
        &sampler,
        &mut rng,
        &schedule,
        Some(&mut recorder),
    );
    debug!(
        temperature = temperature.value(),
        acceptance_ratio = summary.acceptance_ratio(),
        final_energy = summary.final_energy,
        "replica finished"
    );

    Ok(recorder.into_samples())
}

/// Sample every temperature on its own lattice replica.
///
/// Replicas are independent and run in parallel; each single replica is swept sequentially.
/// With a base seed, replica `i` is seeded with `seed + i`, so results are reproducible
/// regardless of thread scheduling.
pub fn scan_temperatures(
    width: usize,
    temperatures: &[f64],
    settings: ScanSettings,
    initial_state: InitialState,
    seed: Option<u64>,
) -> Result<MonteCarloResult> {
    if temperatures.is_empty() {
        return Err(IsingError::EmptyTemperatureScan);
    }
    if width < 2 {
        return Err(IsingError::LatticeTooSmall(width));
    }
    if settings.get_samples_per_temperature() == 0 {
        return Err(IsingError::NoSamples);
    }
    let validated = temperatures
        .iter()
        .map(|t| Temperature::new(*t))
        .collect::<Result<Vec<_>>>()?;

    info!(
        width,
        replicas = validated.len(),
        sweeps_per_replica = settings.total_sweeps(),
        "starting temperature scan"
    );

    let samples = validated
        .par_iter()
        .enumerate()
        .map(|(i, temperature)| {
            run_replica(
                width,
                *temperature,
                &settings,
                initial_state,
                replica_seed(seed, i),
            )
        })
        .collect::<Result<Vec<_>>>()?;

    let (sampled_magnetisations, sampled_energies): (Vec<_>, Vec<_>) =
        samples.into_iter().unzip();

    Ok(MonteCarloResult::new(
        temperatures.to_vec(),
        sampled_magnetisations,
        sampled_energies,
        width * width,
        SquareLattice::description_for(width),
        settings,
    ))
}
