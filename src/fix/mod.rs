//! Position fixes and acquisition decision logic
//!
//! This module holds the `Fix` sample type, the acquisition error
//! taxonomy, and the two pure decision functions applied to every
//! incoming fix:
//! - [`filter::FixFilter`] decides whether a candidate replaces the
//!   current best fix.
//! - [`policy::StopPolicy`] decides whether acquisition should end after
//!   an accepted fix.

pub mod filter;
pub mod policy;

use crate::coord::Coordinates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single reported position sample
///
/// `horizontal_accuracy` is the uncertainty radius in meters: smaller is
/// better, negative marks an invalid reading. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub coords: Coordinates,
    pub horizontal_accuracy: f64,
    pub timestamp: DateTime<Utc>,
}

impl Fix {
    /// Create a new fix
    pub fn new(coords: Coordinates, horizontal_accuracy: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            coords,
            horizontal_accuracy,
            timestamp,
        }
    }

    /// Whether the reported accuracy marks a valid reading
    pub fn is_valid(&self) -> bool {
        self.horizontal_accuracy >= 0.0
    }
}

/// Errors reported by a location source
///
/// `TemporarilyUnresolvable` is transient and absorbed silently by the
/// coordinator; every other kind ends the acquisition run.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum AcquisitionError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location services disabled")]
    ServicesDisabled,

    #[error("location temporarily unresolvable")]
    TemporarilyUnresolvable,

    #[error("location error: {0}")]
    Other(String),
}

impl AcquisitionError {
    /// Transient errors are expected noise and never end a run
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TemporarilyUnresolvable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_validity() {
        let coords = Coordinates::new(40.7128, -74.0060);
        assert!(Fix::new(coords, 0.0, Utc::now()).is_valid());
        assert!(Fix::new(coords, 65.0, Utc::now()).is_valid());
        assert!(!Fix::new(coords, -1.0, Utc::now()).is_valid());
    }

    #[test]
    fn test_transient_classification() {
        assert!(AcquisitionError::TemporarilyUnresolvable.is_transient());
        assert!(!AcquisitionError::PermissionDenied.is_transient());
        assert!(!AcquisitionError::ServicesDisabled.is_transient());
        assert!(!AcquisitionError::Other("gps failure".to_string()).is_transient());
    }

    #[test]
    fn test_acquisition_error_serialization() {
        let err = AcquisitionError::Other("gps failure".to_string());
        let json = serde_json::to_string(&err).unwrap();
        let parsed: AcquisitionError = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, err);

        let json = serde_json::to_string(&AcquisitionError::PermissionDenied).unwrap();
        assert!(json.contains("permission_denied"));
    }
}
