use crate::config::SimulationConfig;
use crate::errors::Result;
use crate::lattice::energy::IsingEnergy;
use crate::lattice::square_lattice::SquareLattice;
use crate::monte_carlo::metropolis::{MetropolisSampler, StepOutcome, Temperature};
use crate::monte_carlo::sweep::{run_sweeps, SweepObserver, SweepSchedule, SweepSummary};
use crate::random::RandomSource;
use tracing::{debug, info};

/// One Metropolis run: a lattice, its random source and the sampler, all owned exclusively.
#[derive(Debug)]
pub struct Simulation {
    lattice: SquareLattice,
    rng: RandomSource,
    sampler: MetropolisSampler,
    schedule: SweepSchedule,
    energy: i64,
}

impl Simulation {
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = RandomSource::new(config.seed)?;
        let lattice = config.initial_state.build(config.lattice_size, &mut rng)?;
        let schedule = SweepSchedule::new(config.sweeps, config.get_steps_per_sweep());
        Ok(Self::with_lattice(
            lattice,
            config.get_temperature()?,
            schedule,
            rng,
        ))
    }

    /// Start from a prepared lattice instead of one built from a config.
    pub fn with_lattice(
        lattice: SquareLattice,
        temperature: Temperature,
        schedule: SweepSchedule,
        rng: RandomSource,
    ) -> Self {
        let energy = IsingEnergy.total_energy(&lattice);
        info!(
            lattice = %lattice.describe(),
            temperature = temperature.value(),
            seed = ?rng.get_seed(),
            initial_energy = energy,
            initial_magnetisation = lattice.get_magnetisation(),
            "simulation initialised"
        );
        Simulation {
            lattice,
            rng,
            sampler: MetropolisSampler::new(temperature),
            schedule,
            energy,
        }
    }

    /// A single Metropolis step outside of the sweep schedule.
    pub fn step(&mut self) -> StepOutcome {
        let outcome = self.sampler.step(&mut self.lattice, &mut self.rng);
        self.energy += outcome.applied_energy_change();
        outcome
    }

    /// Run the configured sweeps, reporting to `observer` after each of them.
    pub fn run(&mut self, observer: Option<&mut dyn SweepObserver>) -> SweepSummary {
        debug!(
            sweeps = self.schedule.sweeps(),
            steps_per_sweep = self.schedule.steps_per_sweep(),
            "starting sweeps"
        );
        let summary = run_sweeps(
            &mut self.lattice,
            &self.sampler,
            &mut self.rng,
            &self.schedule,
            observer,
        );
        self.energy = summary.final_energy;
        info!(
            sweeps = summary.sweeps,
            acceptance_ratio = summary.acceptance_ratio(),
            final_energy = summary.final_energy,
            final_magnetisation = self.lattice.get_magnetisation(),
            "simulation finished"
        );
        summary
    }

    pub fn lattice(&self) -> &SquareLattice {
        &self.lattice
    }

    pub fn into_lattice(self) -> SquareLattice {
        self.lattice
    }

    /// Current total energy, kept up to date without a full recomputation.
    pub fn energy(&self) -> i64 {
        self.energy
    }

    pub fn temperature(&self) -> Temperature {
        self.sampler.get_temperature()
    }

    pub fn schedule(&self) -> &SweepSchedule {
        &self.schedule
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::InitialState;
    use crate::errors::IsingError;
    use crate::monte_carlo::observables::SampleRecorder;

    fn small_config(seed: u64) -> SimulationConfig {
        SimulationConfig {
            lattice_size: 8,
            temperature: 2.,
            sweeps: 20,
            seed: Some(seed),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn simulation_rejects_bad_config() {
        let config = SimulationConfig {
            temperature: -1.,
            ..small_config(1)
        };
        assert!(matches!(
            Simulation::new(&config),
            Err(IsingError::InvalidTemperature(_))
        ));
    }

    #[test]
    fn simulation_defaults_to_one_step_per_site() {
        let simulation = Simulation::new(&small_config(1)).unwrap();
        assert_eq!(simulation.schedule().steps_per_sweep(), 64);
        assert_eq!(simulation.temperature().value(), 2.);
    }

    #[test]
    fn simulation_tracks_energy_through_steps_and_sweeps() {
        let mut simulation = Simulation::new(&small_config(6)).unwrap();

        for _ in 0..200 {
            simulation.step();
            assert_eq!(
                simulation.energy(),
                IsingEnergy.total_energy(simulation.lattice())
            );
        }

        let summary = simulation.run(None);
        assert_eq!(summary.final_energy, simulation.energy());
        assert_eq!(
            simulation.energy(),
            IsingEnergy.total_energy(simulation.lattice())
        );
    }

    #[test]
    fn simulation_is_reproducible_with_seed() {
        let mut first = Simulation::new(&small_config(77)).unwrap();
        let mut second = Simulation::new(&small_config(77)).unwrap();
        first.run(None);
        second.run(None);

        assert!(first.lattice().is_state_equal(second.lattice()));
        assert_eq!(first.energy(), second.energy());
    }

    #[test]
    fn simulation_feeds_observer() {
        let mut simulation = Simulation::new(&small_config(2)).unwrap();
        let mut recorder = SampleRecorder::new(5, 1);

        simulation.run(Some(&mut recorder));

        assert_eq!(recorder.len(), 15);
    }

    #[test]
    fn simulation_from_checkerboard() {
        let config = SimulationConfig {
            initial_state: InitialState::Checkerboard,
            lattice_size: 4,
            ..small_config(3)
        };
        let simulation = Simulation::new(&config).unwrap();

        assert_eq!(simulation.energy(), 32);
        let exported = simulation.into_lattice();
        assert_eq!(exported.rows()[0], vec![1, -1, 1, -1]);
    }
}
