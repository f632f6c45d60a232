//! Common error types for headliner

use thiserror::Error;

/// Common result type for headliner operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the headliner crates
///
/// Join mismatches between the ranking and feature tables are not errors;
/// they travel as diagnostics alongside partial results.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing required key or a population too small for the computation
    #[error("Data error: {0}")]
    Data(String),

    /// Invalid caller-supplied parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV table (wraps csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed TOML configuration (wraps toml::de::Error)
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Shorthand for [`Error::Data`]
    pub fn data(msg: impl Into<String>) -> Self {
        Error::Data(msg.into())
    }
}
