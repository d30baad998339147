//! geofix CLI entry point
//!
//! Location fix acquisition and reverse geocoding - CLI + HTTP server

use geofix::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
