//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod acquire;
pub mod config;
pub mod serve;
pub mod status;

use clap::{Parser, Subcommand};

/// Location fix acquisition and reverse-geocode coordinator
#[derive(Parser)]
#[command(name = "geofix")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Acquire a position fix and resolve its address
    Acquire(acquire::AcquireArgs),

    /// Start the HTTP server (foreground)
    Serve(serve::ServeArgs),

    /// Show the status of a running server
    Status(status::StatusArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Acquire(args) => acquire::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Status(args) => status::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}
