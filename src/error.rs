//! Error types for geofix

use thiserror::Error;

/// Main error type for geofix operations
///
/// Domain errors surfaced through snapshots (`AcquisitionError`,
/// `GeocodeError`) are session data, not variants here — the coordinator
/// never propagates them as control flow.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Location source error: {0}")]
    Source(String),

    #[error("Acquisition error: {0}")]
    Acquisition(String),
}

/// Result type alias for geofix operations
pub type Result<T> = std::result::Result<T, Error>;
