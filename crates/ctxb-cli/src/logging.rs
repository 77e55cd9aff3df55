//! Tracing subscriber setup for the `ctxb` binary.
//!
//! Logs always go to stderr so that stdout carries only the verdict.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Filter directive for a `-v` count.
///
/// With no `-v`, `RUST_LOG` is honoured if set.
pub fn filter_for(verbosity: u8) -> EnvFilter {
    let level = match verbosity {
        0 => {
            return EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        }
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::new(level)
}

/// Install the global subscriber.
pub fn init_tracing(verbosity: u8, format: LogFormat) {
    let filter = filter_for(verbosity);
    match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}
