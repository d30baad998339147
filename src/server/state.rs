//! Server shared state
//!
//! Holds the acquisition service handle shared by the HTTP handlers.

use crate::coordinator::service::AcquisitionHandle;

/// Shared state for the HTTP server
pub struct AppState {
    handle: AcquisitionHandle,
    source_name: String,
}

impl AppState {
    /// Create new application state
    pub fn new(handle: AcquisitionHandle, source_name: impl Into<String>) -> Self {
        Self {
            handle,
            source_name: source_name.into(),
        }
    }

    /// The acquisition service handle
    pub fn handle(&self) -> &AcquisitionHandle {
        &self.handle
    }

    /// Name of the configured location source
    pub fn source_name(&self) -> &str {
        &self.source_name
    }
}
