//! geofix: Location Fix Acquisition & Reverse-Geocode Coordinator
//!
//! A library and CLI tool that turns a noisy, asynchronous stream of
//! position updates into a "good enough" fix and resolves it into a
//! human-readable address, best-effort.
//!
//! ## Features
//!
//! - Accuracy-based fix filtering (stale/invalid/strictly-better rules)
//! - Goal-met and diminishing-returns stop criteria
//! - Single-flight reverse geocoding with forced restart on completion
//! - Pluggable location sources (simulated, scripted replay)
//! - Nominatim reverse-geocoding backend
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use geofix::coord::Coordinates;
//! use geofix::coordinator::{Coordinator, FixOutcome};
//! use geofix::fix::Fix;
//! use chrono::Utc;
//!
//! let mut coordinator = Coordinator::default();
//! coordinator.start();
//!
//! let now = Utc::now();
//! let fix = Fix::new(Coordinates::new(40.7128, -74.0060), 31.0, now);
//! if let FixOutcome::Accepted { geocode: Some(request) } = coordinator.on_fix(fix, now) {
//!     // hand the request to a ReverseGeocoder, then feed the result
//!     // back through coordinator.on_geocode_result(request.id, ...)
//!     println!("lookup #{} for {}", request.id, request.coords);
//! }
//! println!("{:?}", coordinator.snapshot());
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod coordinator;
pub mod error;
pub mod fix;
pub mod format;
pub mod geocode;
pub mod server;
pub mod source;

// Re-export commonly used types
pub use config::Config;
pub use coord::Coordinates;
pub use coordinator::{Coordinator, Phase, Snapshot};
pub use error::{Error, Result};
pub use fix::{AcquisitionError, Fix};
pub use geocode::{Address, GeocodeError};
