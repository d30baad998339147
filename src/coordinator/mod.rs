//! Fix acquisition and reverse-geocode coordination
//!
//! The [`Coordinator`] is the owning state machine: it applies the fix
//! filter and stop policy to incoming location events, schedules reverse
//! lookups with single-flight discipline, and exposes the session as
//! immutable [`Snapshot`]s. It performs no IO itself — `on_fix` returns
//! the lookup to issue as a value and [`service::AcquisitionService`]
//! executes it.
//!
//! All session fields are private; the only way to mutate the session is
//! through the handful of event operations below, which keeps the
//! invariants enforceable at this boundary.

pub mod service;

use crate::config::AcquisitionConfig;
use crate::coord::Coordinates;
use crate::fix::filter::FixFilter;
use crate::fix::policy::{StopDecision, StopPolicy};
use crate::fix::{AcquisitionError, Fix};
use crate::geocode::{Address, GeocodeError, GeocodeResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Tag pairing a geocode completion with the lookup that produced it
///
/// Monotonically increasing for the lifetime of a coordinator, never
/// reset across runs, so a completion can always be checked against the
/// most recently issued request.
pub type RequestId = u64;

/// A reverse lookup the caller must execute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocodeRequest {
    pub id: RequestId,
    pub coords: Coordinates,
}

/// Acquisition lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Acquiring,
    Done,
}

/// Outcome of handling a fix event
#[derive(Debug, Clone, PartialEq)]
pub enum FixOutcome {
    /// Not acquiring; the fix was ignored
    Ignored,
    /// The filter rejected the fix; no state changed
    Rejected,
    /// The fix replaced the current one; `geocode` is the lookup to
    /// issue, if any
    Accepted { geocode: Option<GeocodeRequest> },
}

/// Immutable view of the session state, published after every change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub current_fix: Option<Fix>,
    pub address: Option<Address>,
    pub is_acquiring: bool,
    pub is_geocoding: bool,
    pub last_location_error: Option<AcquisitionError>,
    pub last_geocode_error: Option<GeocodeError>,
}

/// The acquisition session state machine
#[derive(Debug)]
pub struct Coordinator {
    filter: FixFilter,
    policy: StopPolicy,
    phase: Phase,
    current_fix: Option<Fix>,
    previous_fix: Option<Fix>,
    last_location_error: Option<AcquisitionError>,
    address: Option<Address>,
    last_geocode_error: Option<GeocodeError>,
    /// Id of the one outstanding lookup; results with any other id are
    /// superseded and discarded
    in_flight: Option<RequestId>,
    next_request_id: RequestId,
}

impl Coordinator {
    /// Create a coordinator with explicit decision functions
    pub fn new(filter: FixFilter, policy: StopPolicy) -> Self {
        Self {
            filter,
            policy,
            phase: Phase::Idle,
            current_fix: None,
            previous_fix: None,
            last_location_error: None,
            address: None,
            last_geocode_error: None,
            in_flight: None,
            next_request_id: 0,
        }
    }

    /// Create a coordinator from acquisition config
    pub fn from_config(config: &AcquisitionConfig) -> Self {
        Self::new(config.filter(), config.policy())
    }

    /// Begin a new acquisition run
    ///
    /// Valid from `Idle` or `Done`; rejected (returns `false`) while
    /// already acquiring. Resets the whole session except the request-id
    /// counter, which stays monotonic so lookups from a previous run can
    /// never be honored in this one.
    pub fn start(&mut self) -> bool {
        if self.phase == Phase::Acquiring {
            debug!("start rejected: already acquiring");
            return false;
        }
        self.current_fix = None;
        self.previous_fix = None;
        self.last_location_error = None;
        self.address = None;
        self.last_geocode_error = None;
        self.in_flight = None;
        self.phase = Phase::Acquiring;
        debug!("acquisition started");
        true
    }

    /// End the run from outside
    ///
    /// Idempotent. Abandons the single-flight slot: a lookup still in
    /// flight will have its late result discarded, so a stopped session's
    /// address cannot be resurrected.
    pub fn stop(&mut self) -> bool {
        if self.phase != Phase::Acquiring {
            return false;
        }
        self.phase = Phase::Done;
        self.in_flight = None;
        debug!("acquisition stopped by caller");
        true
    }

    /// Handle a fix event from the location source
    pub fn on_fix(&mut self, fix: Fix, now: DateTime<Utc>) -> FixOutcome {
        if self.phase != Phase::Acquiring {
            return FixOutcome::Ignored;
        }
        if !self.filter.accept(self.current_fix.as_ref(), &fix, now) {
            trace!(accuracy = fix.horizontal_accuracy, "fix rejected");
            return FixOutcome::Rejected;
        }

        self.last_location_error = None;
        self.previous_fix = self.current_fix.replace(fix);
        debug!(
            accuracy = fix.horizontal_accuracy,
            lat = fix.coords.lat,
            lng = fix.coords.lng,
            "fix accepted"
        );

        let decision =
            self.policy
                .evaluate(self.previous_fix.as_ref(), &fix, self.in_flight.is_some());

        let geocode = match decision {
            StopDecision::Continue => {
                if self.in_flight.is_none() {
                    Some(self.issue_geocode(fix.coords))
                } else {
                    None
                }
            }
            StopDecision::GoalMet => {
                debug!("desired accuracy reached, stopping");
                self.phase = Phase::Done;
                // Force a fresh lookup for the final fix; any lookup in
                // flight is superseded by the new id
                Some(self.issue_geocode(fix.coords))
            }
            StopDecision::DiminishingReturns => {
                debug!("fixes stopped improving, stopping");
                self.phase = Phase::Done;
                // The in-flight lookup completes naturally
                None
            }
        };

        FixOutcome::Accepted { geocode }
    }

    /// Handle an error event from the location source
    ///
    /// Transient errors are absorbed; any other kind ends the run and is
    /// surfaced in the snapshot. Returns whether state changed.
    pub fn on_location_error(&mut self, err: AcquisitionError) -> bool {
        if self.phase != Phase::Acquiring {
            return false;
        }
        if err.is_transient() {
            trace!("transient location error ignored");
            return false;
        }
        debug!(%err, "acquisition failed");
        self.last_location_error = Some(err);
        // A lookup in flight stays honored: lookups are independent of
        // acquisition errors
        self.phase = Phase::Done;
        true
    }

    /// Handle a reverse lookup completion
    ///
    /// A result whose id does not match the most recently issued request
    /// is superseded and discarded silently. Returns whether state
    /// changed.
    pub fn on_geocode_result(&mut self, id: RequestId, result: GeocodeResult) -> bool {
        if self.in_flight != Some(id) {
            debug!(id, "discarding superseded geocode result");
            return false;
        }
        self.in_flight = None;
        match result {
            Ok(address) => {
                debug!(id, "geocode resolved");
                self.address = Some(address);
                self.last_geocode_error = None;
            }
            Err(err) => {
                debug!(id, %err, "geocode failed");
                self.address = None;
                self.last_geocode_error = Some(err);
            }
        }
        true
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the run is still listening for fixes
    pub fn is_acquiring(&self) -> bool {
        self.phase == Phase::Acquiring
    }

    /// Whether exactly one lookup is outstanding
    pub fn is_geocoding(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Immutable view of the session
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_fix: self.current_fix,
            address: self.address.clone(),
            is_acquiring: self.is_acquiring(),
            is_geocoding: self.is_geocoding(),
            last_location_error: self.last_location_error.clone(),
            last_geocode_error: self.last_geocode_error.clone(),
        }
    }

    fn issue_geocode(&mut self, coords: Coordinates) -> GeocodeRequest {
        let id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight = Some(id);
        GeocodeRequest { id, coords }
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(FixFilter::default(), StopPolicy::default())
    }
}
