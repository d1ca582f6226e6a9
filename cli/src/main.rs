//! # bindist Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the bindist release packager.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Running the packaging command and reporting failures
//!
//! ## Architecture
//!
//! - `commands::package`: selects the binary, plans and writes the release archive
//! - `common`: shared archive and filesystem utilities
//! - `core`: error types and the release layout configuration
//!
//! All errors are propagated to this level, where they are logged and printed
//! before the process exits with status 1.
//!
//! ## Examples
//!
//! ```bash
//! # Package the current directory into bnme-bindist.zip
//! bindist
//!
//! # Same, with progress logging
//! bindist -v
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Packaging command
mod common; // Shared utilities (archive, fs)
mod core; // Core infrastructure (errors, config)

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "bindist",
    about = "Package release build artifacts into a distributable zip archive",
    long_about = "Collects the built binary, documentation, configuration and data trees\n\
                  into a single deflate-compressed zip archive (bnme-bindist.zip by default).",
    version
)]
struct Cli {
    #[command(flatten)]
    package: commands::package::PackageArgs,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
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

    if let Err(e) = commands::package::handle_package(cli.package) {
        tracing::error!("Packaging failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
