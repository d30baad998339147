//! Reverse geocoding
//!
//! Resolves a coordinate to a structured, human-readable address.
//! Lookups are best-effort: a failed lookup never affects fix
//! acquisition, it only surfaces in the session snapshot.

pub mod nominatim;

use crate::coord::Coordinates;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A structured postal address, all parts optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl Address {
    /// Whether no part of the address is populated
    pub fn is_empty(&self) -> bool {
        self.house_number.is_none()
            && self.street.is_none()
            && self.locality.is_none()
            && self.region.is_none()
            && self.postal_code.is_none()
    }
}

/// Why a reverse lookup produced no address
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum GeocodeError {
    #[error("no address found for coordinate")]
    NotFound,

    #[error("geocoder network failure: {0}")]
    NetworkFailure(String),

    #[error("geocoder error: {0}")]
    Other(String),
}

/// Result of a single reverse lookup
pub type GeocodeResult = std::result::Result<Address, GeocodeError>;

/// Trait for reverse-geocoding backends
///
/// Implementations must be thread-safe (Send + Sync); lookups run on
/// spawned tasks. Exactly one call is made per coordinator-issued
/// request; staleness of late results is the coordinator's problem, not
/// the backend's.
pub trait ReverseGeocoder: Send + Sync {
    /// Resolve a coordinate to an address
    fn reverse_geocode(
        &self,
        coords: Coordinates,
    ) -> impl std::future::Future<Output = GeocodeResult> + Send;
}

/// Get the default reverse-geocoding backend
pub fn get_geocoder() -> nominatim::NominatimGeocoder {
    nominatim::NominatimGeocoder::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_is_empty() {
        assert!(Address::default().is_empty());

        let addr = Address {
            street: Some("Broadway".to_string()),
            ..Default::default()
        };
        assert!(!addr.is_empty());
    }

    #[test]
    fn test_address_serialization_skips_missing_parts() {
        let addr = Address {
            street: Some("Broadway".to_string()),
            locality: Some("New York".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_string(&addr).unwrap();
        assert!(json.contains("Broadway"));
        assert!(!json.contains("house_number"));

        let parsed: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, addr);
    }

    #[test]
    fn test_geocode_error_serialization() {
        let err = GeocodeError::NetworkFailure("connection refused".to_string());
        let json = serde_json::to_string(&err).unwrap();
        let parsed: GeocodeError = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, err);
    }
}
