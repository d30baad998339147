//! Geographic coordinates
//!
//! Shared coordinate type and great-circle distance used by the fix
//! filter, the stop policy, and the geocoding backends.

use crate::constants::geo::EARTH_RADIUS_METERS;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.lat < -90.0 || self.lat > 90.0 {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if self.lng < -180.0 || self.lng > 180.0 {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.8}, {:.8}", self.lat, self.lng)
    }
}

/// Calculate the distance between two points in meters (Haversine formula)
///
/// # Arguments
/// * `p1` - First point
/// * `p2` - Second point
///
/// # Returns
/// Distance in meters
pub fn haversine_distance(p1: Coordinates, p2: Coordinates) -> f64 {
    let lat1 = p1.lat * PI / 180.0;
    let lat2 = p2.lat * PI / 180.0;
    let delta_lat = (p2.lat - p1.lat) * PI / 180.0;
    let delta_lng = (p2.lng - p1.lng) * PI / 180.0;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_validate_ok() {
        assert!(Coordinates::new(40.7128, -74.0060).validate().is_ok());
        assert!(Coordinates::new(-90.0, 180.0).validate().is_ok());
    }

    #[test]
    fn test_validate_out_of_range() {
        assert!(Coordinates::new(91.0, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, -181.0).validate().is_err());
    }

    #[test]
    fn test_haversine_distance() {
        // NYC to a point one degree north (about 111 km)
        let nyc = Coordinates::new(40.7128, -74.0060);
        let north = Coordinates::new(41.7128, -74.0060);

        let distance = haversine_distance(nyc, north);
        assert!(
            (distance - 111_000.0).abs() < 1000.0,
            "Distance {} should be approximately 111000",
            distance
        );
    }

    #[test]
    fn test_haversine_zero() {
        let p = Coordinates::new(51.5074, -0.1278);
        assert_relative_eq!(haversine_distance(p, p), 0.0);
    }

    #[test]
    fn test_haversine_sub_meter() {
        // ~0.5 m apart along a meridian (1 deg lat ~ 111.32 km)
        let a = Coordinates::new(48.8566, 2.3522);
        let b = Coordinates::new(48.8566 + 0.0000045, 2.3522);

        let distance = haversine_distance(a, b);
        assert!(distance < 1.0, "Distance {} should be under a meter", distance);
        assert!(distance > 0.1);
    }

    #[test]
    fn test_display_eight_decimals() {
        let p = Coordinates::new(40.7128, -74.006);
        assert_eq!(p.to_string(), "40.71280000, -74.00600000");
    }
}
