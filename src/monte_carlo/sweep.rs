use crate::lattice::square_lattice::SquareLattice;
use crate::monte_carlo::metropolis::MetropolisSampler;
use tracing::trace;

/// How many sweeps to run and how many proposals make up one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepSchedule {
    sweeps: u64,
    steps_per_sweep: u64,
}

impl SweepSchedule {
    pub fn new(sweeps: u64, steps_per_sweep: u64) -> Self {
        SweepSchedule {
            sweeps,
            steps_per_sweep,
        }
    }

    /// One proposal per site on average, i.e. N^2 steps per sweep.
    pub fn for_lattice(sweeps: u64, lattice: &SquareLattice) -> Self {
        Self::new(sweeps, lattice.number_sites() as u64)
    }

    pub fn sweeps(&self) -> u64 {
        self.sweeps
    }

    pub fn steps_per_sweep(&self) -> u64 {
        self.steps_per_sweep
    }
}

/// What an observer gets to see after a sweep has finished.
#[derive(Debug, Clone, Copy)]
pub struct SweepSnapshot<'a> {
    /// Zero based index of the sweep that just finished.
    pub sweep: u64,
    pub lattice: &'a SquareLattice,
    /// Total energy of `lattice`.
    pub energy: i64,
    pub proposed: u64,
    pub accepted: u64,
}

impl SweepSnapshot<'_> {
    pub fn energy_per_site(&self) -> f64 {
        self.energy as f64 / self.lattice.number_sites() as f64
    }

    pub fn magnetisation(&self) -> f64 {
        self.lattice.get_magnetisation()
    }
}

/// Called once at the end of every sweep, e.g. for rendering or collecting statistics.
///
/// Observers only get shared access, so they cannot change the lattice.
pub trait SweepObserver {
    fn observe(&mut self, snapshot: &SweepSnapshot<'_>);
}

impl<F> SweepObserver for F
where
    F: FnMut(&SweepSnapshot<'_>),
{
    fn observe(&mut self, snapshot: &SweepSnapshot<'_>) {
        self(snapshot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepSummary {
    pub sweeps: u64,
    pub proposed: u64,
    pub accepted: u64,
    pub initial_energy: i64,
    pub final_energy: i64,
}

impl SweepSummary {
    pub fn acceptance_ratio(&self) -> f64 {
        if self.proposed == 0 {
            return 0.;
        }
        self.accepted as f64 / self.proposed as f64
    }
}

/// Run `schedule.sweeps()` sweeps of exactly `schedule.steps_per_sweep()` Metropolis steps.
///
/// Steps are strictly sequential since every proposal depends on the lattice left behind by the
/// previous one. The total energy is computed once up front and then carried along by adding the
/// energy change of each accepted flip.
pub fn run_sweeps<R: rand::Rng + ?Sized>(
    lattice: &mut SquareLattice,
    sampler: &MetropolisSampler,
    rng: &mut R,
    schedule: &SweepSchedule,
    mut observer: Option<&mut dyn SweepObserver>,
) -> SweepSummary {
    let initial_energy = sampler.get_energy_model().total_energy(lattice);
    let mut energy = initial_energy;
    let mut total_accepted = 0u64;

    for sweep in 0..schedule.sweeps() {
        let mut accepted = 0u64;
        for _ in 0..schedule.steps_per_sweep() {
            let outcome = sampler.step(lattice, rng);
            if outcome.is_accepted() {
                accepted += 1;
                energy += outcome.delta_energy;
            }
        }
        total_accepted += accepted;

        trace!(sweep, energy, accepted, "sweep finished");

        if let Some(observer) = observer.as_deref_mut() {
            observer.observe(&SweepSnapshot {
                sweep,
                lattice,
                energy,
                proposed: schedule.steps_per_sweep(),
                accepted,
            });
        }
    }

    debug_assert_eq!(energy, sampler.get_energy_model().total_energy(lattice));

    SweepSummary {
        sweeps: schedule.sweeps(),
        proposed: schedule.sweeps() * schedule.steps_per_sweep(),
        accepted: total_accepted,
        initial_energy,
        final_energy: energy,
    }
}
