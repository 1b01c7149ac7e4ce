use crate::errors::{IsingError, Result};
use crate::lattice::energy::IsingEnergy;
use crate::lattice::square_lattice::SquareLattice;
use crate::lattice::SiteIdx;

/// Largest energy change a single flip can cause with four neighbours and unit coupling.
pub const MAX_FLIP_DELTA: i64 = 8;

/// Positive, finite temperature in units where k_B = J = 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature {
    value: f64,
    beta: f64,
}

impl Temperature {
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || value <= 0. {
            return Err(IsingError::InvalidTemperature(value));
        }
        Ok(Temperature {
            value,
            beta: 1. / value,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Inverse temperature 1/T.
    pub fn beta(&self) -> f64 {
        self.beta
    }
}

/// min(1, exp(-beta * dE)), the probability that a flip with energy change `delta_energy` is taken.
pub fn acceptance_probability(delta_energy: i64, beta: f64) -> f64 {
    f64::min(1.0, (-beta * delta_energy as f64).exp())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub site: SiteIdx,
    pub delta_energy: i64,
    pub decision: Decision,
}

impl StepOutcome {
    pub fn is_accepted(&self) -> bool {
        self.decision == Decision::Accepted
    }

    /// Change of the total energy actually caused by this step.
    pub fn applied_energy_change(&self) -> i64 {
        match self.decision {
            Decision::Accepted => self.delta_energy,
            Decision::Rejected => 0,
        }
    }
}

/// Single spin flip Metropolis update at a fixed temperature.
#[derive(Debug, Clone)]
pub struct MetropolisSampler {
    temperature: Temperature,
    energy: IsingEnergy,
    // exp(-beta * dE) for dE = 0..=MAX_FLIP_DELTA
    boltzmann_factors: [f64; MAX_FLIP_DELTA as usize + 1],
}

impl MetropolisSampler {
    pub fn new(temperature: Temperature) -> Self {
        let mut boltzmann_factors = [1.; MAX_FLIP_DELTA as usize + 1];
        for (delta, factor) in boltzmann_factors.iter_mut().enumerate() {
            *factor = (-temperature.beta() * delta as f64).exp();
        }
        MetropolisSampler {
            temperature,
            energy: IsingEnergy,
            boltzmann_factors,
        }
    }

    pub fn get_temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn get_energy_model(&self) -> &IsingEnergy {
        &self.energy
    }

    fn boltzmann_factor(&self, delta_energy: i64) -> f64 {
        match usize::try_from(delta_energy) {
            Ok(idx) if idx < self.boltzmann_factors.len() => self.boltzmann_factors[idx],
            _ => (-self.temperature.beta() * delta_energy as f64).exp(),
        }
    }

    /// Metropolis rule: downhill and flat moves always pass, uphill moves pass iff
    /// exp(-beta * dE) > u. The comparison must stay strict and in this orientation.
    pub fn accepts(&self, delta_energy: i64, u: f64) -> bool {
        if delta_energy <= 0 {
            return true;
        }
        self.boltzmann_factor(delta_energy) > u
    }

    /// Propose one flip at a uniformly drawn site and apply it if accepted.
    ///
    /// A uniform number is only drawn for uphill moves.
    pub fn step<R: rand::Rng + ?Sized>(
        &self,
        lattice: &mut SquareLattice,
        rng: &mut R,
    ) -> StepOutcome {
        let (row, col) = lattice.draw_random_index(rng);
        let delta_energy = self.energy.flip_energy_delta(lattice, row, col);

        let accepted = delta_energy <= 0 || self.accepts(delta_energy, rng.random::<f64>());
        let decision = if accepted {
            lattice.flip(row, col);
            Decision::Accepted
        } else {
            Decision::Rejected
        };

        StepOutcome {
            site: (row, col),
            delta_energy,
            decision,
        }
    }
}
