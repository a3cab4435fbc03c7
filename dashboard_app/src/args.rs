//! Command-line arguments for the stocks dashboard.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use dashboard_common::sheets::{DEFAULT_SOURCE, METADATA_SHEET};
use dashboard_common::Period;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Spreadsheet with a metadata sheet and one history sheet per ticker.
    #[clap(long, default_value = DEFAULT_SOURCE)]
    pub path: String,

    /// Ticker shown in the history panel (defaults to the first listed ticker).
    #[clap(long)]
    pub ticker: Option<String>,

    /// Trailing window for the history panel.
    #[clap(long, value_enum, ignore_case = true, default_value_t = Period::Trimester)]
    pub period: Period,

    /// Anchor date of the trailing window, `YYYY-MM-DD` (defaults to the local date).
    #[clap(long)]
    pub today: Option<NaiveDate>,

    /// Name of the sheet holding ticker metadata.
    #[clap(long, default_value = METADATA_SHEET)]
    pub metadata_sheet: String,

    /// Write the candlestick chart spec of the history panel to this JSON file.
    #[clap(long)]
    pub chart_json: Option<PathBuf>,

    /// Read `<TICKER> [PERIOD]` lines from stdin and re-render after each one.
    #[clap(long)]
    pub interactive: bool,

    /// Disable ANSI colors.
    #[clap(long)]
    pub plain: bool,
}
