#![deny(missing_docs)]

//! # OASGen CLI
//!
//! Command Line Interface for the OpenAPI reference resolution and
//! semantic analysis engine.
//!
//! Supported commands:
//! - `analyze`: Emit the per-operation semantic model as JSON.
//! - `validate`: Load a document with its references and run structural validation.
//! - `inspect`: Summarize servers, operations and components of a document.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod analyze;
mod error;
mod inspect;
mod spec_args;
mod validate;

use crate::error::CliResult;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI / Swagger analysis for client generators")]
struct Cli {
    /// Log filter (e.g. `debug`, `oasgen_core=trace`). Overrides `RUST_LOG`.
    #[clap(long, global = true)]
    log_level: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Emit the semantic model of every operation and webhook.
    Analyze(analyze::AnalyzeArgs),
    /// Validate a document and everything it references.
    Validate(validate::ValidateArgs),
    /// Print a summary of a parsed document.
    Inspect(inspect::InspectArgs),
}

/// Installs the stderr subscriber. Defaults to `warn` so stdout stays clean JSON.
fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Analyze(args) => analyze::execute(&args),
        Commands::Validate(args) => {
            println!("{}", validate::execute(&args)?);
            Ok(())
        }
        Commands::Inspect(args) => inspect::execute(&args),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
