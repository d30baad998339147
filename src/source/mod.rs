//! Location sources
//!
//! This module defines the `LocationSource` trait and implementations for
//! the backends that can feed the coordinator. Each backend is a single
//! file implementing the trait.
//!
//! A subscription is a stream of [`LocationEvent`]s over a channel; the
//! producer task is aborted when the subscription is unsubscribed or
//! dropped. Sources make no promise that fix accuracy converges
//! monotonically — that is the coordinator's filter's job.

pub mod replay;
pub mod sim;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fix::{AcquisitionError, Fix};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// An event delivered by a location source
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    Fix(Fix),
    Error(AcquisitionError),
}

/// A live subscription to a location source
///
/// Dropping the subscription unsubscribes: the producer task is aborted
/// and no further events are delivered.
#[derive(Debug)]
pub struct Subscription {
    events: mpsc::Receiver<LocationEvent>,
    producer: JoinHandle<()>,
}

impl Subscription {
    /// Wrap a receiving channel and its producer task
    pub fn new(events: mpsc::Receiver<LocationEvent>, producer: JoinHandle<()>) -> Self {
        Self { events, producer }
    }

    /// Receive the next event, or `None` once the source is exhausted
    pub async fn next_event(&mut self) -> Option<LocationEvent> {
        self.events.recv().await
    }

    /// Explicitly end the subscription
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.producer.abort();
    }
}

/// Trait for location source backends
///
/// Implementations must be thread-safe (Send + Sync). `subscribe` must be
/// called from within a tokio runtime; it spawns the producer task.
pub trait LocationSource: Send + Sync {
    /// Returns the source name (e.g. "sim", "replay")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of this source
    fn description(&self) -> &'static str;

    /// Open a new event subscription
    fn subscribe(&self) -> Result<Subscription>;
}

/// Information about a source backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Source name (used in config/CLI)
    pub name: String,
    /// Human-readable description
    pub description: String,
}

/// Get a source by name
///
/// `replay_file` is required by the replay source and ignored by others.
pub fn get_source(
    name: &str,
    config: &Config,
    replay_file: Option<&std::path::Path>,
) -> Result<Box<dyn LocationSource>> {
    match name {
        "sim" => Ok(Box::new(sim::SimulatedSource::new(config.sim.clone()))),
        "replay" => {
            let path = replay_file.ok_or_else(|| {
                Error::Source("replay source requires a replay file".to_string())
            })?;
            Ok(Box::new(replay::ReplaySource::from_file(path)?))
        }
        other => Err(Error::Source(format!("Unknown location source: {}", other))),
    }
}

/// List all available sources with their info
pub fn available_sources() -> Vec<SourceInfo> {
    vec![
        SourceInfo {
            name: "sim".to_string(),
            description: "Simulated GPS converging coarse-to-fine (for development)".to_string(),
        },
        SourceInfo {
            name: "replay".to_string(),
            description: "Replays a scripted sequence of fixes and errors from a JSON file"
                .to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_source_sim() {
        let config = Config::default();
        let source = get_source("sim", &config, None).unwrap();
        assert_eq!(source.name(), "sim");
    }

    #[test]
    fn test_get_source_unknown() {
        let config = Config::default();
        assert!(get_source("gps", &config, None).is_err());
    }

    #[test]
    fn test_get_source_replay_requires_file() {
        let config = Config::default();
        assert!(get_source("replay", &config, None).is_err());
    }

    #[test]
    fn test_available_sources() {
        let sources = available_sources();
        assert_eq!(sources.len(), 2);
        assert!(sources.iter().any(|s| s.name == "sim"));
        assert!(sources.iter().any(|s| s.name == "replay"));
    }
}
