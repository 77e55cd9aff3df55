//! # ctxb CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber and
//! dispatches to the subcommand handler.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use ctxb_cli::logging::{init_tracing, LogFormat};
use ctxb_cli::validate::{run_validate, ValidateArgs};
use ctxb_cli::EXIT_TOOLING_ERROR;

/// Context packet validator.
///
/// Checks a JSON or YAML context packet against a schema and against its own
/// timing fields (created_at, ttl, expires_at), then reports a verdict for CI.
#[derive(Parser, Debug)]
#[command(name = "ctxb", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log line format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a context packet against a schema and its timing fields.
    Validate(ValidateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "ctxb starting");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_TOOLING_ERROR)
        }
    }
}
