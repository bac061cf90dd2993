//! # DeviceHub Main Entry Point
//!
//! File: server/src/main.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Entry point for the `devicehub` binary. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up logging based on verbosity flags (or `RUST_LOG`)
//! - Routing execution to the command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Run the API on the default port (3001)
//! devicehub serve
//!
//! # Same, with request-level logging
//! devicehub -vv serve
//!
//! # Predict the simulated status of an address
//! devicehub check 10.0.0.42
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Subcommand handlers (serve, check)
mod common; // Device inventory: store, validation, status simulation
mod core; // Errors and configuration

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "devicehub",
    about = "DeviceHub: network device inventory API with simulated status checks",
    long_about = "Stores network device records in memory behind a small REST API \
                  and reports a deterministic, simulated online/offline status per device.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Run the REST API server.
    #[command(alias = "s")]
    Serve(commands::serve::ServeArgs),
    /// Print the simulated status for an IP address.
    #[command(alias = "c")]
    Check(commands::check::CheckArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Serve(args) => commands::serve::handle_serve(args).await,
        Commands::Check(args) => commands::check::handle_check(args),
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
