//! Human-readable text output formatter
//!
//! Renders a snapshot the way the classic current-location screen did:
//! a status line while there is no fix, otherwise coordinates to eight
//! decimal places with the address (or lookup progress) underneath.

use crate::coordinator::Snapshot;
use crate::error::Result;
use crate::fix::AcquisitionError;
use crate::format::SnapshotFormatter;
use crate::geocode::Address;

/// Text formatter - outputs a human-readable snapshot
pub struct TextFormatter;

/// Status line shown while there is no fix to display
pub fn status_message(snapshot: &Snapshot) -> String {
    match &snapshot.last_location_error {
        Some(AcquisitionError::PermissionDenied) | Some(AcquisitionError::ServicesDisabled) => {
            "Location services disabled".to_string()
        }
        Some(_) => "Error getting location".to_string(),
        None if snapshot.is_acquiring => "Searching...".to_string(),
        None => "No location yet".to_string(),
    }
}

/// Address line(s) shown under a fix
pub fn address_message(snapshot: &Snapshot) -> String {
    match &snapshot.address {
        Some(address) => format_address(address),
        None if snapshot.is_geocoding => "Searching for address...".to_string(),
        None if snapshot.last_geocode_error.is_some() => "Error finding address".to_string(),
        None => "No address found".to_string(),
    }
}

/// Two-line postal rendering: house number and street, then locality,
/// region and postal code
pub fn format_address(address: &Address) -> String {
    let line1: Vec<&str> = [&address.house_number, &address.street]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect();
    let line2: Vec<&str> = [&address.locality, &address.region, &address.postal_code]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect();

    match (line1.is_empty(), line2.is_empty()) {
        (true, true) => String::new(),
        (false, true) => line1.join(" "),
        (true, false) => line2.join(" "),
        (false, false) => format!("{}\n{}", line1.join(" "), line2.join(" ")),
    }
}

impl SnapshotFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, snapshot: &Snapshot) -> Result<String> {
        let mut output = String::new();

        match &snapshot.current_fix {
            Some(fix) => {
                output.push_str(&format!("Latitude:  {:.8}\n", fix.coords.lat));
                output.push_str(&format!("Longitude: {:.8}\n", fix.coords.lng));
                output.push_str(&format!("Accuracy:  {:.0} m\n", fix.horizontal_accuracy));

                let address = address_message(snapshot);
                let mut lines = address.lines();
                if let Some(first) = lines.next() {
                    output.push_str(&format!("Address:   {}\n", first));
                }
                for line in lines {
                    output.push_str(&format!("           {}\n", line));
                }
            }
            None => {
                output.push_str(&status_message(snapshot));
                output.push('\n');
            }
        }

        Ok(output)
    }
}
