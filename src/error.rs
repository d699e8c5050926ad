//! Error types for the telemetry generator

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the telemetry generator
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid catalog configuration
    #[error("Invalid catalog spec: {0}")]
    InvalidSpec(String),

    /// Two instruments resolved to the same registered name
    #[error("Duplicate instrument name: {0}")]
    DuplicateInstrument(String),

    /// Listen address could not be parsed
    #[error("Invalid listen address: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Exposition output could not be encoded
    #[error("Exposition encode error: {0}")]
    Encode(#[from] std::fmt::Error),
}
