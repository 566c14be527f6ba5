//! Command-line interface for `dashctl`.
//!
//! Defines the CLI contract using clap derive macros.
//!
//! # Examples
//!
//! ```bash
//! # Second page of active brokers named like "park", newest first
//! dashctl list brokers.json --search park --status active --sort created_at-desc --page 2
//!
//! # Records created in February, as JSON
//! dashctl list sales.json --from 2024-02-01 --to 2024-02-29 --json
//!
//! # Per-status counts
//! dashctl stats tasks.json
//!
//! # Drive a goal control from stdin
//! printf '+\ntype 7\nwait\n' | dashctl target --current 3 --ceiling 10
//! ```

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use dashkit::filter::SortDirective;
use dashkit::record::{parse_lower_bound, parse_upper_bound};

/// Filter, page and adjust dashboard records from the command line.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "dashctl",
    author,
    version,
    about = "Filter, page and adjust dashboard records",
    long_about = "Loads a JSON array of records (brokers, sales, listings, tasks) and \
                  exposes search, status and date-range filtering, sorting, pagination \
                  and a debounced numeric target control."
)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, short = 'c', global = true, env = "DASHCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print one page of filtered, sorted records
    List(ListArgs),

    /// Print per-status record counts
    Stats(StatsArgs),

    /// Run a numeric target control driven by events on stdin
    Target(TargetArgs),
}

/// Arguments for the `list` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// JSON file holding an array of records
    pub file: PathBuf,

    /// Case-insensitive substring to search for
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Fields searched, comma separated (overrides config)
    #[arg(long, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,

    /// Only records whose status equals this value ("all" disables)
    #[arg(long)]
    pub status: Option<String>,

    /// Sort directive, e.g. "name-asc" or "created_at-desc"
    #[arg(long, value_parser = parse_sort)]
    pub sort: Option<SortDirective>,

    /// Inclusive start of the date range (a bare date is the start of that day)
    #[arg(long, value_parser = parse_lower_bound)]
    pub from: Option<DateTime<Utc>>,

    /// Inclusive end of the date range (a bare date is the end of that day)
    #[arg(long, value_parser = parse_upper_bound)]
    pub to: Option<DateTime<Utc>>,

    /// Field tested by --from/--to (overrides config)
    #[arg(long)]
    pub date_field: Option<String>,

    /// Page to show, 1-based; clamped to the last page
    #[arg(long, short = 'p', default_value_t = 1)]
    pub page: usize,

    /// Records per page (overrides config)
    #[arg(long)]
    pub per_page: Option<usize>,

    /// Columns shown in the table, comma separated (overrides config)
    #[arg(long, value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// Print the page as a JSON array instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `stats` subcommand.
#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    /// JSON file holding an array of records
    pub file: PathBuf,
}

/// Arguments for the `target` subcommand.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Value the control starts from
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub current: f64,

    /// Upper bound of the control
    #[arg(long)]
    pub ceiling: f64,

    /// Fixed step for +/- (derived from the ceiling when omitted)
    #[arg(long, value_parser = parse_step)]
    pub step: Option<f64>,

    /// Quiet period before typed input is committed (overrides config)
    #[arg(long)]
    pub debounce_ms: Option<u64>,
}

fn parse_step(s: &str) -> Result<f64, String> {
    let step: f64 = s.parse().map_err(|_| format!("invalid number {s:?}"))?;
    if step.is_finite() && step > 0.0 {
        Ok(step)
    } else {
        Err(format!("step must be a positive finite number, got {s}"))
    }
}

fn parse_sort(s: &str) -> Result<SortDirective, dashkit::filter::ParseSortError> {
    s.parse()
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Get log level based on verbosity.
    #[must_use]
    pub const fn log_level(&self) -> LogLevel {
        match self.verbose {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Log level for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Only show warnings and errors
    Warn,
    /// Show info messages
    Info,
    /// Show debug messages
    Debug,
    /// Show all messages including trace
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    #[must_use]
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}
