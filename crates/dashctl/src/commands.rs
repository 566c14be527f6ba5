//! Subcommand implementations.
//!
//! Each command writes to a caller-supplied writer so it can be exercised
//! without a terminal.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use dashkit::filter::{FilterView, status_counts};
use dashkit::paginator::Paginator;
use unicode_width::UnicodeWidthStr;

use crate::cli::{Cli, Command, ListArgs, StatsArgs, TargetArgs};
use crate::config::Config;
use crate::records::{self, RecordRow};
use crate::session::{self, SessionOptions};
use crate::table::Table;

/// Dispatches the parsed command line.
///
/// # Errors
///
/// Returns an error if configuration or input files are invalid, or output
/// cannot be written.
pub fn run<R: BufRead, W: Write>(cli: &Cli, input: R, out: &mut W) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    match &cli.command {
        Command::List(args) => list(args, config, out),
        Command::Stats(args) => stats(args, out),
        Command::Target(args) => target(args, &config, input, out),
    }
}

/// Builds the filtered view described by `args`.
#[must_use]
pub fn build_view(rows: Vec<RecordRow>, args: &ListArgs, config: &Config) -> FilterView<RecordRow> {
    let mut view =
        FilterView::new(rows, config.search_fields.iter().cloned()).date_field(&config.date_field);
    if let Some(search) = &args.search {
        view.set_search_value(search.as_str());
    }
    if let Some(status) = &args.status {
        view.set_selected_status(status.as_str());
    }
    view.set_sort_by(args.sort.clone());
    view.set_start_date(args.from);
    view.set_end_date(args.to);
    view
}

/// Prints one page of filtered records.
///
/// # Errors
///
/// Returns an error for invalid flags, unreadable records, or failed writes.
pub fn list<W: Write>(args: &ListArgs, config: Config, out: &mut W) -> Result<()> {
    let config = config.with_list_args(args)?;
    let rows = records::load(&args.file)?;
    let view = build_view(rows, args, &config);
    let visible = view.filtered_data();

    let mut paginator = Paginator::new()
        .per_page(config.items_per_page)
        .total_items(visible.len());
    paginator.handle_page_change(args.page);
    let page = paginator.paginate(&visible);
    tracing::info!(
        matched = page.total_items,
        page = page.current_page,
        pages = page.total_pages,
        "page selected"
    );

    if args.json {
        let json = serde_json::to_string_pretty(page.items).context("failed to encode page")?;
        writeln!(out, "{json}")?;
        return Ok(());
    }

    if page.items.is_empty() {
        writeln!(out, "no matching records")?;
    } else {
        writeln!(out, "{}", Table::new(&config.columns, page.items).view())?;
    }
    writeln!(out)?;
    writeln!(out, "page {} · {} items", paginator.view(), page.total_items)?;
    Ok(())
}

/// Prints per-status counts in first-seen order.
///
/// # Errors
///
/// Returns an error for unreadable records or failed writes.
pub fn stats<W: Write>(args: &StatsArgs, out: &mut W) -> Result<()> {
    let rows = records::load(&args.file)?;
    let counts = status_counts(&rows);
    let width = counts
        .iter()
        .map(|(status, _)| status.width())
        .max()
        .unwrap_or(0);
    for (status, count) in &counts {
        let fill = width - status.width();
        writeln!(out, "{status}{}  {count}", " ".repeat(fill))?;
    }
    writeln!(out, "{}", "-".repeat(width + 2 + rows.len().to_string().len()))?;
    writeln!(out, "total{}  {}", " ".repeat(width.saturating_sub(5)), rows.len())?;
    Ok(())
}

/// Runs a numeric target session over `input`.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub fn target<R: BufRead, W: Write>(
    args: &TargetArgs,
    config: &Config,
    input: R,
    out: &mut W,
) -> Result<()> {
    let config = config.clone().with_target_args(args);
    let options = SessionOptions {
        current: args.current,
        ceiling: args.ceiling,
        step: args.step,
        debounce: config.debounce(),
    };
    session::run(options, input, out).context("target session failed")
}
