//! HTTP server for geofix
//!
//! Exposes the acquisition service over a small REST API: start/stop the
//! run, fetch the latest snapshot, probe server status.

pub mod routes;
pub mod state;

use crate::config::Config;
use crate::coordinator::service::AcquisitionService;
use crate::coordinator::Coordinator;
use crate::error::Result;
use crate::geocode::nominatim::NominatimGeocoder;
use crate::source::get_source;
use routes::create_router;
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Start the HTTP server
///
/// # Arguments
/// * `config` - Server configuration
///
/// # Returns
/// Never returns unless the server shuts down
pub async fn run(config: Config) -> Result<()> {
    let addr = config.server_addr();
    run_on(&addr, config).await
}

/// Start the HTTP server with a specific address
///
/// Useful for tests or when you want to override config
pub async fn run_on(addr: &str, config: Config) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| crate::error::Error::Server(format!("Invalid server address: {}", e)))?;

    let source_name = config.defaults.source.clone();
    let source = get_source(&source_name, &config, None)?;
    let geocoder = NominatimGeocoder::with_base_url(config.geocoder.endpoint.clone());
    let coordinator = Coordinator::from_config(&config.acquisition);

    let (handle, _task) = AcquisitionService::new(coordinator, source, geocoder).spawn();
    let state = Arc::new(AppState::new(handle, source_name));
    let app = create_router(state);

    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| crate::error::Error::Server(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| crate::error::Error::Server(format!("Server error: {}", e)))?;

    Ok(())
}
