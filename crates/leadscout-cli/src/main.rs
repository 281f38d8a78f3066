//! LeadScout CLI
//!
//! Candidate discovery and qualification for healthcare recruiting.

use anyhow::Result;
use clap::Parser;
use leadscout_core::error::exit_codes;
use leadscout_core::{Database, LeadScoutError};
use std::path::PathBuf;

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "leadscout=debug,leadscout_core=debug,leadscout_mcp=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Discover(args) => commands::discover::run(args, cli.format).await,
        Commands::Quota(args) => commands::quota::run(args, cli.format),
        Commands::Extract(args) => commands::extract::run(args, cli.format),
        Commands::Parse(args) => commands::parse::run(args, cli.format),
        Commands::Mcp => commands::mcp::run().await,
    }
}

/// Database path (`LEADSCOUT_DB` if set, otherwise the cache directory)
pub fn database_path() -> PathBuf {
    std::env::var("LEADSCOUT_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| Database::default_path())
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<LeadScoutError>()
        .map(LeadScoutError::exit_code)
        .unwrap_or(exit_codes::GENERAL_ERROR)
}
