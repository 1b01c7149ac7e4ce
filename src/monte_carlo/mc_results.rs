use crate::monte_carlo::temperature_scan::ScanSettings;
use num_traits::Pow;
use serde::Deserialize;
use serde::Serialize;
use statrs::statistics::Statistics;

use crate::utils::SerdeOnceCell;

fn apply_to_each_sample(samples: &[Vec<f64>], func: impl Fn(&Vec<f64>) -> f64) -> Vec<f64> {
    samples.iter().map(func).collect()
}

fn binder_cumulant(magnetisation_sample: &Vec<f64>) -> f64 {
    1. - magnetisation_sample.iter().map(|m| m.pow(4)).mean()
        / (3. * magnetisation_sample.iter().map(|m| m.pow(2)).mean().pow(2))
}

/// Samples of one temperature scan together with lazily derived thermodynamic estimates.
///
/// Magnetisations and energies are stored per site, one sample vector per temperature.
#[derive(Debug, Serialize, Deserialize)]
pub struct MonteCarloResult {
    temperatures: Vec<f64>,
    sampled_magnetisations: Vec<Vec<f64>>,
    sampled_energies: Vec<Vec<f64>>,
    num_spins: usize,
    lattice_description: String,
    settings: ScanSettings,
    avg_abs_magnetisations: SerdeOnceCell<Vec<f64>>,
    avg_energies: SerdeOnceCell<Vec<f64>>,
    heat_capacities: SerdeOnceCell<Vec<f64>>,
    magnetic_susceptibilities: SerdeOnceCell<Vec<f64>>,
    binder_cumulants: SerdeOnceCell<Vec<f64>>,
}

impl MonteCarloResult {
    pub fn new(
        temperatures: Vec<f64>,
        sampled_magnetisations: Vec<Vec<f64>>,
        sampled_energies: Vec<Vec<f64>>,
        num_spins: usize,
        lattice_description: String,
        settings: ScanSettings,
    ) -> Self {
        assert_eq!(temperatures.len(), sampled_magnetisations.len());
        assert_eq!(temperatures.len(), sampled_energies.len());

        MonteCarloResult {
            temperatures,
            sampled_magnetisations,
            sampled_energies,
            num_spins,
            lattice_description,
            settings,
            avg_abs_magnetisations: SerdeOnceCell::new(),
            avg_energies: SerdeOnceCell::new(),
            heat_capacities: SerdeOnceCell::new(),
            magnetic_susceptibilities: SerdeOnceCell::new(),
            binder_cumulants: SerdeOnceCell::new(),
        }
    }

    pub fn get_temperatures(&self) -> &Vec<f64> {
        &self.temperatures
    }

    pub fn get_sampled_magnetisations(&self) -> &Vec<Vec<f64>> {
        &self.sampled_magnetisations
    }

    pub fn get_sampled_energies(&self) -> &Vec<Vec<f64>> {
        &self.sampled_energies
    }

    pub fn get_num_spins(&self) -> usize {
        self.num_spins
    }

    pub fn get_lattice_description(&self) -> &str {
        &self.lattice_description
    }

    pub fn get_settings(&self) -> &ScanSettings {
        &self.settings
    }

    pub fn get_avg_abs_magnetisations(&self) -> &Vec<f64> {
        self.avg_abs_magnetisations.get_or_init(|| {
            apply_to_each_sample(&self.sampled_magnetisations, |v| {
                v.iter().map(|m| m.abs()).mean()
            })
        })
    }

    pub fn get_avg_energies(&self) -> &Vec<f64> {
        self.avg_energies
            .get_or_init(|| apply_to_each_sample(&self.sampled_energies, |v| v.mean()))
    }

    /// Heat capacity per site, N * Var(e) / T^2 with e the energy per site.
    fn calc_heat_capacities(&self) -> Vec<f64> {
        apply_to_each_sample(&self.sampled_energies, |v| v.variance())
            .iter()
            .zip(&self.temperatures)
            .map(|(var_e, temperature)| self.num_spins as f64 * var_e / temperature.pow(2))
            .collect()
    }

    pub fn get_heat_capacities(&self) -> &Vec<f64> {
        self.heat_capacities
            .get_or_init(|| self.calc_heat_capacities())
    }

    /// Susceptibility per site, N * Var(m) / T.
    fn calc_magnetic_susceptibilities(&self) -> Vec<f64> {
        apply_to_each_sample(&self.sampled_magnetisations, |v| v.variance())
            .iter()
            .zip(&self.temperatures)
            .map(|(var_m, temperature)| self.num_spins as f64 * var_m / temperature)
            .collect()
    }

    pub fn get_magnetic_susceptibilities(&self) -> &Vec<f64> {
        self.magnetic_susceptibilities
            .get_or_init(|| self.calc_magnetic_susceptibilities())
    }

    pub fn get_binder_cumulants(&self) -> &Vec<f64> {
        self.binder_cumulants
            .get_or_init(|| apply_to_each_sample(&self.sampled_magnetisations, binder_cumulant))
    }
}
