//! Status command handler
//!
//! Probes a running geofix server and shows its state.

use crate::config::Config;
use crate::coordinator::Snapshot;
use crate::error::Result;
use crate::format::text::TextFormatter;
use crate::format::SnapshotFormatter;
use clap::Args;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Server host (defaults to configured host)
    #[arg(long)]
    pub host: Option<String>,

    /// Server port (defaults to configured port)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    let addr = config.server_addr();

    println!("geofix v{}", env!("CARGO_PKG_VERSION"));
    println!();

    let status_url = format!("http://{}/api/status", addr);
    match reqwest::get(&status_url).await {
        Ok(response) if response.status().is_success() => {
            println!("Server: RUNNING on {}", addr);
            if let Ok(status) = response.json::<serde_json::Value>().await {
                if let Some(version) = status.get("version").and_then(|v| v.as_str()) {
                    println!("  Version: {}", version);
                }
                if let Some(source) = status.get("source").and_then(|v| v.as_str()) {
                    println!("  Source: {}", source);
                }
                if let Some(acquiring) = status.get("is_acquiring").and_then(|v| v.as_bool()) {
                    println!("  Acquiring: {}", acquiring);
                }
            }
        }
        Ok(response) => {
            println!("Server: ERROR (status {})", response.status());
            return Ok(());
        }
        Err(_) => {
            println!("Server: NOT RUNNING on {}", addr);
            return Ok(());
        }
    }
    println!();

    // Show the current snapshot too
    let snapshot_url = format!("http://{}/api/snapshot", addr);
    if let Ok(response) = reqwest::get(&snapshot_url).await {
        if let Ok(snapshot) = response.json::<Snapshot>().await {
            let formatter = TextFormatter;
            print!("{}", formatter.format(&snapshot)?);
        }
    }

    Ok(())
}
