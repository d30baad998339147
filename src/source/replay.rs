//! Scripted replay source
//!
//! Replays a fixed sequence of fixes and errors, typically loaded from a
//! JSON file. Used for reproducing acquisition runs in tests and demos.
//!
//! Fix timestamps are stamped at emission time minus `age_ms`, so a step
//! with a large age exercises the staleness rule no matter when the
//! script runs.

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::fix::{AcquisitionError, Fix};
use crate::source::{LocationEvent, LocationSource, Subscription};
use chrono::{Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;

/// One step of a replay script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayStep {
    /// Emit a fix
    Fix {
        lat: f64,
        lng: f64,
        accuracy: f64,
        /// How old the fix should appear at emission time
        #[serde(default)]
        age_ms: i64,
        /// Pause before emitting
        #[serde(default)]
        delay_ms: u64,
    },
    /// Emit a source error
    Error {
        error: AcquisitionError,
        #[serde(default)]
        delay_ms: u64,
    },
}

/// Location source that replays a scripted event sequence
///
/// The subscription ends (the event channel closes) once the script is
/// exhausted.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    steps: Vec<ReplayStep>,
}

impl ReplaySource {
    /// Create a replay source from an in-memory script
    pub fn from_steps(steps: Vec<ReplayStep>) -> Self {
        Self { steps }
    }

    /// Load a replay script from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Source(format!("Failed to read replay file: {}", e)))?;
        let steps: Vec<ReplayStep> = serde_json::from_str(&content)
            .map_err(|e| Error::Source(format!("Failed to parse replay file: {}", e)))?;
        Ok(Self { steps })
    }

    /// Number of steps in the script
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the script is empty
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl LocationSource for ReplaySource {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn description(&self) -> &'static str {
        "Replays a scripted sequence of fixes and errors from a JSON file"
    }

    fn subscribe(&self) -> Result<Subscription> {
        let steps = self.steps.clone();
        let (tx, rx) = mpsc::channel(16);

        let producer = tokio::spawn(async move {
            for step in steps {
                let event = match step {
                    ReplayStep::Fix {
                        lat,
                        lng,
                        accuracy,
                        age_ms,
                        delay_ms,
                    } => {
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        let timestamp = Utc::now() - ChronoDuration::milliseconds(age_ms);
                        LocationEvent::Fix(Fix::new(
                            Coordinates::new(lat, lng),
                            accuracy,
                            timestamp,
                        ))
                    }
                    ReplayStep::Error { error, delay_ms } => {
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        LocationEvent::Error(error)
                    }
                };
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            // Channel closes when tx drops: subscription reports exhaustion
        });

        Ok(Subscription::new(rx, producer))
    }
}
