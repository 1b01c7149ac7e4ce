use crate::monte_carlo::sweep::{SweepObserver, SweepSnapshot};

/// Records magnetisation and energy per site once the lattice has thermalised.
///
/// The first `burn_in_sweeps` sweeps are skipped, after that every `sample_interval`-th sweep
/// is recorded.
#[derive(Debug, Clone, Default)]
pub struct SampleRecorder {
    burn_in_sweeps: u64,
    sample_interval: u64,
    magnetisations: Vec<f64>,
    energies: Vec<f64>,
}

impl SampleRecorder {
    pub fn new(burn_in_sweeps: u64, sample_interval: u64) -> Self {
        SampleRecorder {
            burn_in_sweeps,
            sample_interval: sample_interval.max(1),
            magnetisations: Vec::new(),
            energies: Vec::new(),
        }
    }

    fn should_record(&self, sweep: u64) -> bool {
        sweep >= self.burn_in_sweeps && (sweep + 1 - self.burn_in_sweeps) % self.sample_interval == 0
    }

    pub fn get_magnetisations(&self) -> &Vec<f64> {
        &self.magnetisations
    }

    pub fn get_energies(&self) -> &Vec<f64> {
        &self.energies
    }

    pub fn len(&self) -> usize {
        self.magnetisations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnetisations.is_empty()
    }

    pub fn into_samples(self) -> (Vec<f64>, Vec<f64>) {
        (self.magnetisations, self.energies)
    }
}

impl SweepObserver for SampleRecorder {
    fn observe(&mut self, snapshot: &SweepSnapshot<'_>) {
        if self.should_record(snapshot.sweep) {
            self.magnetisations.push(snapshot.magnetisation());
            self.energies.push(snapshot.energy_per_site());
        }
    }
}
