//! Error types for the glasses try-on engine.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A transform parameter update carried a non-finite value
    #[error("Invalid parameter {name}: {value} is not finite")]
    InvalidParameter {
        /// Field name of the rejected parameter
        name: String,
        /// Rejected value
        value: f64,
    },

    /// A settings update named a field that does not exist
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// Filter construction error
    #[error("Filter error: {0}")]
    FilterError(String),

    /// Landmark detector could not be initialized; tracking is disabled
    #[error("Detector unavailable: {0}")]
    DetectorUnavailable(String),

    /// A single detection call failed
    #[error("Detection failed: {0}")]
    DetectionFailed(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Landmark trace could not be read or parsed
    #[error("Trace error: {0}")]
    TraceError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
