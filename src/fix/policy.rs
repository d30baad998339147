//! Acquisition stop criteria
//!
//! Evaluated only immediately after the filter accepted a candidate and
//! it replaced the current fix. Pure, like the filter.

use crate::coord::haversine_distance;
use crate::fix::Fix;
use chrono::Duration;

/// Outcome of a stop-policy evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopDecision {
    /// Keep listening for better fixes
    Continue,
    /// Accuracy reached the desired threshold; stop listening and force a
    /// fresh geocode for the final fix, superseding any lookup in flight
    GoalMet,
    /// Fixes stopped improving meaningfully while a lookup is in flight;
    /// stop listening and let that lookup complete naturally
    DiminishingReturns,
}

/// Policy deciding when acquisition has done its job
#[derive(Debug, Clone)]
pub struct StopPolicy {
    desired_accuracy: f64,
    min_progress_meters: f64,
    progress_timeout: Duration,
}

impl StopPolicy {
    /// Create a stop policy
    ///
    /// # Arguments
    /// * `desired_accuracy` - accuracy (meters) at which the goal is met
    /// * `min_progress_meters` - movement below this counts as no progress
    /// * `progress_timeout` - how long no-progress is tolerated while a
    ///   geocode is in flight
    pub fn new(desired_accuracy: f64, min_progress_meters: f64, progress_timeout: Duration) -> Self {
        Self {
            desired_accuracy,
            min_progress_meters,
            progress_timeout,
        }
    }

    /// Decide whether acquisition should end after `accepted` replaced
    /// `previous` as the current fix
    ///
    /// Goal-met is checked first: a fix that satisfies both triggers
    /// stops with the forced geocode.
    pub fn evaluate(
        &self,
        previous: Option<&Fix>,
        accepted: &Fix,
        geocode_in_flight: bool,
    ) -> StopDecision {
        if accepted.horizontal_accuracy <= self.desired_accuracy {
            return StopDecision::GoalMet;
        }

        if geocode_in_flight {
            if let Some(previous) = previous {
                let moved = haversine_distance(previous.coords, accepted.coords);
                let elapsed = accepted.timestamp - previous.timestamp;
                if moved < self.min_progress_meters && elapsed > self.progress_timeout {
                    return StopDecision::DiminishingReturns;
                }
            }
        }

        StopDecision::Continue
    }
}

impl Default for StopPolicy {
    fn default() -> Self {
        use crate::config::defaults::{
            DEFAULT_DESIRED_ACCURACY_METERS, DEFAULT_MIN_PROGRESS_METERS,
            DEFAULT_PROGRESS_TIMEOUT_SECS,
        };
        Self::new(
            DEFAULT_DESIRED_ACCURACY_METERS,
            DEFAULT_MIN_PROGRESS_METERS,
            Duration::seconds(DEFAULT_PROGRESS_TIMEOUT_SECS as i64),
        )
    }
}
