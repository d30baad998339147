//! Simulated location source for development and testing
//!
//! Emits fixes that converge coarse-to-fine around a configured center,
//! the way a real receiver warms up. Uses the `rand` crate;
//! deterministic when seeded.

use crate::config::SimConfig;
use crate::constants::geo::METERS_PER_DEGREE_LAT;
use crate::coord::Coordinates;
use crate::error::Result;
use crate::fix::{AcquisitionError, Fix};
use crate::source::{LocationEvent, LocationSource, Subscription};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;
use std::time::Duration;
use tokio::sync::mpsc;

/// Simulated GPS source
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    config: SimConfig,
}

impl SimulatedSource {
    /// Create a simulated source from config
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }
}

impl LocationSource for SimulatedSource {
    fn name(&self) -> &'static str {
        "sim"
    }

    fn description(&self) -> &'static str {
        "Simulated GPS converging coarse-to-fine (for development)"
    }

    fn subscribe(&self) -> Result<Subscription> {
        let cfg = self.config.clone();
        let (tx, rx) = mpsc::channel(16);

        let producer = tokio::spawn(async move {
            let mut rng: StdRng = match cfg.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let center = Coordinates::new(cfg.lat, cfg.lng);
            let mut accuracy = cfg.initial_accuracy_meters;

            loop {
                if cfg.transient_error_rate > 0.0 && rng.gen::<f64>() < cfg.transient_error_rate {
                    if tx
                        .send(LocationEvent::Error(AcquisitionError::TemporarilyUnresolvable))
                        .await
                        .is_err()
                    {
                        break;
                    }
                } else {
                    // Sample a position inside the current uncertainty radius
                    let r = accuracy * rng.gen_range(0.0..0.5);
                    let theta = rng.gen_range(0.0..TAU);
                    let dlat = r * theta.cos() / METERS_PER_DEGREE_LAT;
                    let dlng =
                        r * theta.sin() / (METERS_PER_DEGREE_LAT * cfg.lat.to_radians().cos());
                    let coords = Coordinates::new(center.lat + dlat, center.lng + dlng);

                    let fix = Fix::new(coords, accuracy, Utc::now());
                    if tx.send(LocationEvent::Fix(fix)).await.is_err() {
                        break;
                    }

                    // Tighten the uncertainty, with some wobble so the
                    // stream is not monotonic
                    accuracy = (accuracy * cfg.convergence_factor * rng.gen_range(0.85..1.15))
                        .max(cfg.floor_accuracy_meters);
                }

                tokio::time::sleep(Duration::from_millis(cfg.interval_ms)).await;
            }
        });

        Ok(Subscription::new(rx, producer))
    }
}
