#![forbid(unsafe_code)]

//! # dashctl
//!
//! Filter, page and adjust dashboard records from the command line.
//!
//! ## Usage
//!
//! ```bash
//! dashctl list brokers.json --status active --sort name-asc
//! dashctl stats tasks.json
//! dashctl target --current 3 --ceiling 10 < events.txt
//! ```

use anyhow::Result;
use dashctl::cli::{Cli, LogLevel};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.log_level());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    dashctl::commands::run(&cli, stdin.lock(), &mut out)
}

/// Logs to stderr; `RUST_LOG` takes precedence over `-v`.
fn init_tracing(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
