//! Async acquisition driver
//!
//! Wires a location source subscription and a reverse geocoder to the
//! [`Coordinator`](super::Coordinator) state machine. All events funnel
//! through one `select!` loop, so the core never sees two handlers run
//! concurrently and needs no locking. Lookups run on spawned tasks; only
//! their tagged completions re-enter the loop.
//!
//! Observers consume session snapshots through a `tokio::sync::watch`
//! channel: every state-changing event publishes a fresh immutable
//! snapshot.

use crate::coordinator::{Coordinator, FixOutcome, GeocodeRequest, RequestId, Snapshot};
use crate::error::{Error, Result};
use crate::fix::AcquisitionError;
use crate::geocode::{GeocodeResult, ReverseGeocoder};
use crate::source::{LocationEvent, LocationSource, Subscription};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Control messages accepted by a running service
///
/// Each carries an ack channel reporting whether the coordinator actually
/// changed state (a start while acquiring is rejected, a stop while idle
/// is a no-op).
#[derive(Debug)]
pub enum Command {
    Start(oneshot::Sender<bool>),
    Stop(oneshot::Sender<bool>),
}

/// Handle to a spawned acquisition service
///
/// Cheap to clone. Dropping every handle shuts the service down.
#[derive(Debug, Clone)]
pub struct AcquisitionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Snapshot>,
}

impl AcquisitionHandle {
    /// Begin a new acquisition run
    ///
    /// Returns whether a run actually started; `false` means one was
    /// already in progress.
    pub async fn start(&self) -> Result<bool> {
        let (ack, acked) = oneshot::channel();
        self.send(Command::Start(ack)).await?;
        acked
            .await
            .map_err(|_| Error::Acquisition("acquisition service has shut down".to_string()))
    }

    /// End the current run
    ///
    /// Idempotent; returns whether a run was actually stopped.
    pub async fn stop(&self) -> Result<bool> {
        let (ack, acked) = oneshot::channel();
        self.send(Command::Stop(ack)).await?;
        acked
            .await
            .map_err(|_| Error::Acquisition("acquisition service has shut down".to_string()))
    }

    /// The latest published snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Subscribe to snapshot updates
    pub fn snapshots(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| Error::Acquisition("acquisition service has shut down".to_string()))
    }
}

/// Drives a coordinator against a source and a geocoder
pub struct AcquisitionService<G> {
    coordinator: Coordinator,
    source: Box<dyn LocationSource>,
    geocoder: Arc<G>,
}

impl<G> AcquisitionService<G>
where
    G: ReverseGeocoder + 'static,
{
    /// Create a service around a coordinator, source and geocoder
    pub fn new(coordinator: Coordinator, source: Box<dyn LocationSource>, geocoder: G) -> Self {
        Self {
            coordinator,
            source,
            geocoder: Arc::new(geocoder),
        }
    }

    /// Spawn the event loop
    ///
    /// Returns the control handle and the loop's join handle. The loop
    /// runs until every `AcquisitionHandle` is dropped.
    pub fn spawn(self) -> (AcquisitionHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(8);
        let (snapshot_tx, snapshot_rx) = watch::channel(self.coordinator.snapshot());

        let task = tokio::spawn(self.run(command_rx, snapshot_tx));

        (
            AcquisitionHandle {
                commands: command_tx,
                snapshots: snapshot_rx,
            },
            task,
        )
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        snapshots: watch::Sender<Snapshot>,
    ) {
        let (result_tx, mut results) = mpsc::channel::<(RequestId, GeocodeResult)>(8);
        let mut subscription: Option<Subscription> = None;

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    None => break,
                    Some(Command::Start(ack)) => {
                        let started = self.coordinator.start();
                        if started {
                            match self.source.subscribe() {
                                Ok(sub) => subscription = Some(sub),
                                Err(e) => {
                                    warn!(%e, "failed to subscribe to location source");
                                    self.coordinator.on_location_error(
                                        AcquisitionError::Other(e.to_string()),
                                    );
                                }
                            }
                            publish(&snapshots, &self.coordinator);
                        }
                        let _ = ack.send(started);
                    }
                    Some(Command::Stop(ack)) => {
                        let stopped = self.coordinator.stop();
                        if stopped {
                            subscription = None;
                            publish(&snapshots, &self.coordinator);
                        }
                        let _ = ack.send(stopped);
                    }
                },

                event = next_location_event(&mut subscription) => match event {
                    Some(LocationEvent::Fix(fix)) => {
                        match self.coordinator.on_fix(fix, Utc::now()) {
                            FixOutcome::Ignored | FixOutcome::Rejected => {}
                            FixOutcome::Accepted { geocode } => {
                                if let Some(request) = geocode {
                                    self.dispatch(request, &result_tx);
                                }
                                if !self.coordinator.is_acquiring() {
                                    subscription = None;
                                }
                                publish(&snapshots, &self.coordinator);
                            }
                        }
                    }
                    Some(LocationEvent::Error(err)) => {
                        if self.coordinator.on_location_error(err) {
                            subscription = None;
                            publish(&snapshots, &self.coordinator);
                        }
                    }
                    None => {
                        debug!("location source exhausted");
                        subscription = None;
                    }
                },

                Some((id, result)) = results.recv() => {
                    if self.coordinator.on_geocode_result(id, result) {
                        publish(&snapshots, &self.coordinator);
                    }
                }
            }
        }
    }

    fn dispatch(&self, request: GeocodeRequest, result_tx: &mpsc::Sender<(RequestId, GeocodeResult)>) {
        debug!(id = request.id, "dispatching reverse geocode");
        let geocoder = Arc::clone(&self.geocoder);
        let tx = result_tx.clone();
        tokio::spawn(async move {
            let result = geocoder.reverse_geocode(request.coords).await;
            let _ = tx.send((request.id, result)).await;
        });
    }
}

/// Wait for the next source event; pends forever while unsubscribed so
/// the select branch stays quiet
async fn next_location_event(subscription: &mut Option<Subscription>) -> Option<LocationEvent> {
    match subscription {
        Some(sub) => sub.next_event().await,
        None => std::future::pending().await,
    }
}

fn publish(snapshots: &watch::Sender<Snapshot>, coordinator: &Coordinator) {
    let _ = snapshots.send(coordinator.snapshot());
}
