pub mod config;
pub mod errors;
pub mod lattice;
pub mod monte_carlo;
pub mod random;
pub mod simulation;
pub mod utils;
