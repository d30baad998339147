//! Nominatim reverse-geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API.
//! Rate limit: 1 request per second (enforced by User-Agent requirement)

use crate::constants::api::NOMINATIM_URL;
use crate::coord::Coordinates;
use crate::geocode::{Address, GeocodeError, GeocodeResult, ReverseGeocoder};
use serde::Deserialize;

const USER_AGENT: &str = "geofix/0.1.0";

/// Nominatim reverse-geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

/// Nominatim reverse response
///
/// A 200 response may still carry an `error` field (e.g. for points in
/// the open ocean) instead of an address.
#[derive(Debug, Deserialize)]
struct NominatimResponse {
    error: Option<String>,
    address: Option<NominatimAddress>,
}

/// The `address` object of a reverse response, reduced to the parts we
/// surface
#[derive(Debug, Deserialize)]
struct NominatimAddress {
    house_number: Option<String>,
    road: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
}

impl NominatimGeocoder {
    /// Create a new Nominatim backend against the public endpoint
    pub fn new() -> Self {
        Self::with_base_url(NOMINATIM_URL)
    }

    /// Create a backend against a specific endpoint (self-hosted or test)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn to_address(addr: NominatimAddress) -> Address {
        // Nominatim reports the locality as city, town or village
        // depending on the place type
        let locality = addr.city.or(addr.town).or(addr.village);
        Address {
            house_number: addr.house_number,
            street: addr.road,
            locality,
            region: addr.state,
            postal_code: addr.postcode,
        }
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse_geocode(&self, coords: Coordinates) -> GeocodeResult {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1",
            self.base_url, coords.lat, coords.lng
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GeocodeError::NetworkFailure(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Err(GeocodeError::NotFound);
            }
            return Err(GeocodeError::Other(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let result: NominatimResponse = response.json().await.map_err(|e| {
            GeocodeError::Other(format!("Failed to parse Nominatim response: {}", e))
        })?;

        if result.error.is_some() {
            return Err(GeocodeError::NotFound);
        }

        match result.address {
            Some(addr) => {
                let address = Self::to_address(addr);
                if address.is_empty() {
                    Err(GeocodeError::NotFound)
                } else {
                    Ok(address)
                }
            }
            None => Err(GeocodeError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reverse_response() {
        let json = r#"{
            "lat": "52.5487",
            "lon": "-1.8164",
            "display_name": "137, Pilkington Avenue, Sutton Coldfield, England, B72 1LH",
            "address": {
                "house_number": "137",
                "road": "Pilkington Avenue",
                "town": "Sutton Coldfield",
                "state": "England",
                "postcode": "B72 1LH",
                "country": "United Kingdom"
            }
        }"#;

        let parsed: NominatimResponse = serde_json::from_str(json).unwrap();
        let address = NominatimGeocoder::to_address(parsed.address.unwrap());

        assert_eq!(address.house_number.as_deref(), Some("137"));
        assert_eq!(address.street.as_deref(), Some("Pilkington Avenue"));
        assert_eq!(address.locality.as_deref(), Some("Sutton Coldfield"));
        assert_eq!(address.region.as_deref(), Some("England"));
        assert_eq!(address.postal_code.as_deref(), Some("B72 1LH"));
    }

    #[test]
    fn test_parse_locality_fallback() {
        let json = r#"{
            "address": { "village": "Grasmere", "state": "England" }
        }"#;

        let parsed: NominatimResponse = serde_json::from_str(json).unwrap();
        let address = NominatimGeocoder::to_address(parsed.address.unwrap());

        assert_eq!(address.locality.as_deref(), Some("Grasmere"));
        assert!(address.street.is_none());
    }

    #[test]
    fn test_parse_error_response() {
        // Ocean points come back 200 with an error field
        let json = r#"{ "error": "Unable to geocode" }"#;
        let parsed: NominatimResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.error.is_some());
        assert!(parsed.address.is_none());
    }

    #[test]
    fn test_backend_creation() {
        let backend = NominatimGeocoder::new();
        assert!(backend.base_url.contains("nominatim"));
    }
}
