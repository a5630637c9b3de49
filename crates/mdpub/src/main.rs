//! mdpub CLI - Markdown to Confluence publisher.
//!
//! Provides commands for:
//! - `publish`: Create or update Confluence pages from markdown documents
//! - `check`: Show what would be published without contacting Confluence

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, PublishArgs};
use output::Output;

/// mdpub - Publish markdown documents to Confluence.
#[derive(Parser)]
#[command(name = "mdpub", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish markdown documents to Confluence.
    Publish(PublishArgs),
    /// List the pages a publish would deploy, without contacting Confluence.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Publish(args) => args.verbose,
        Commands::Check(args) => args.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Publish(args) => args.execute(),
        Commands::Check(args) => args.execute(),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}
