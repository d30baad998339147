//! Acquire command handler
//!
//! Runs one acquisition in the foreground, rendering each published
//! snapshot until the run settles (or a deadline passes).

use crate::config::Config;
use crate::coordinator::service::{AcquisitionHandle, AcquisitionService};
use crate::coordinator::Coordinator;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter};
use crate::geocode::nominatim::NominatimGeocoder;
use crate::source::{available_sources, get_source};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Acquire command arguments
#[derive(Args)]
pub struct AcquireArgs {
    /// Location source
    #[arg(long, short = 's')]
    pub source: Option<String>,

    /// Replay script file (for the replay source)
    #[arg(long)]
    pub replay_file: Option<PathBuf>,

    /// Desired accuracy in meters
    #[arg(long, short = 'a')]
    pub accuracy: Option<f64>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Give up after this many seconds
    #[arg(long, default_value = "60")]
    pub timeout: u64,

    /// List available sources
    #[arg(short = 'S', long = "list-sources")]
    pub list_sources: bool,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the acquire command
pub async fn run(args: AcquireArgs) -> Result<()> {
    if args.list_sources {
        for source in available_sources() {
            println!("{}: {}", source.name, source.description);
        }
        return Ok(());
    }
    if args.list_formats {
        for format in available_formats() {
            println!("{}: {}", format.name, format.description);
        }
        return Ok(());
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let mut config = Config::load()?;
    if let Some(accuracy) = args.accuracy {
        config.acquisition.desired_accuracy_meters = accuracy;
    }

    let source_name = args.source.unwrap_or_else(|| config.defaults.source.clone());
    let source = get_source(&source_name, &config, args.replay_file.as_deref())?;

    let format_name = args.format.unwrap_or_else(|| config.defaults.format.clone());
    let formatter = get_formatter(&format_name)
        .ok_or_else(|| Error::Config(format!("Unknown output format: {}", format_name)))?;

    let geocoder = NominatimGeocoder::with_base_url(config.geocoder.endpoint.clone());
    let coordinator = Coordinator::from_config(&config.acquisition);
    let (handle, _task) = AcquisitionService::new(coordinator, source, geocoder).spawn();

    handle.start().await?;

    let deadline = Duration::from_secs(args.timeout);
    match tokio::time::timeout(deadline, watch_run(&handle, formatter.as_ref())).await {
        Ok(result) => result?,
        Err(_) => {
            handle.stop().await?;
            eprintln!("Timed out after {}s", args.timeout);
        }
    }

    // Final state, whichever way the run ended
    println!("{}", formatter.format(&handle.snapshot())?);
    Ok(())
}

/// Render each snapshot until the run settles
async fn watch_run(
    handle: &AcquisitionHandle,
    formatter: &dyn crate::format::SnapshotFormatter,
) -> Result<()> {
    let mut snapshots = handle.snapshots();
    loop {
        {
            let snapshot = snapshots.borrow_and_update().clone();
            println!("{}", formatter.format(&snapshot)?);
            if !snapshot.is_acquiring && !snapshot.is_geocoding && snapshot.current_fix.is_some() {
                return Ok(());
            }
            if !snapshot.is_acquiring
                && !snapshot.is_geocoding
                && snapshot.last_location_error.is_some()
            {
                return Ok(());
            }
        }
        if snapshots.changed().await.is_err() {
            return Ok(());
        }
    }
}
