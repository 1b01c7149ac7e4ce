use thiserror::Error;

/// Errors raised while setting up a simulation run.
///
/// Every variant is produced before the first Monte Carlo step; sampling itself cannot fail.
#[derive(Debug, Error)]
pub enum IsingError {
    #[error("periodic dimension must be positive, got {0}")]
    InvalidDimension(usize),
    #[error("lattice width must be at least 2, got {0}")]
    LatticeTooSmall(usize),
    #[error("temperature must be positive and finite, got {0}")]
    InvalidTemperature(f64),
    #[error("spin at ({row}, {col}) is {value}, expected -1 or +1")]
    InvalidSpin { row: usize, col: usize, value: i8 },
    #[error("row {row} has {len} spins, expected {width}")]
    NotSquare { row: usize, len: usize, width: usize },
    #[error("temperature scan needs at least one temperature")]
    EmptyTemperatureScan,
    #[error("sampling settings leave no samples per temperature")]
    NoSamples,
    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: String,
        source: toml::de::Error,
    },
    #[error("os entropy source unavailable: {0}")]
    EntropyUnavailable(String),
}

pub type Result<T> = std::result::Result<T, IsingError>;
