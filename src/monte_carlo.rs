pub mod mc_results;
pub mod metropolis;
pub mod observables;
pub mod sweep;
pub mod temperature_scan;
