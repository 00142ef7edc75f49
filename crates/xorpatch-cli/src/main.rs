//! xorpatch binary entry point.
//!
//! This is a thin wrapper around the xorpatch-formats library that:
//! 1. Initializes logging
//! 2. Parses command-line arguments
//! 3. Runs the requested generate, apply or inspect command

mod cli;
mod commands;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();
    commands::run(cli)
}
