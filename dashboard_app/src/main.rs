//! Stocks Dashboard: a terminal front end over the dashboard pipeline.
//!
//! Reads a workbook with a `ticker` metadata sheet and one history sheet per
//! symbol, then prints the watchlist cards, the history panel for one ticker and
//! period, and the overview table. With `--interactive`, every `<TICKER> [PERIOD]`
//! line typed on stdin re-runs load → normalize → aggregate → present through the
//! same session, so the workbook is only re-read when the file changes.
//!
//! Usage example (CLI):
//! ```bash
//! dashboard_app --path "Stock Dashboard.xlsx" --ticker AAPL --period month --chart-json chart.json
//! ```
#![warn(missing_docs)]
mod args;
mod format;
mod render;
mod view;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::Parser;
use dashboard_common::{DashboardError, Period, Result, SheetLayout};
use dashboard_pipeline::{DashboardSession, LoadCache};
use log::{error, info, warn};

use crate::args::Args;
use crate::render::Renderer;
use crate::view::chart::CandlestickChart;
use crate::view::overview::overview_rows;
use crate::view::watchlist::watchlist_rows;

/// One user selection: which ticker and period the history panel shows.
#[derive(Debug, Clone, PartialEq)]
struct Selection {
    ticker: Option<String>,
    period: Period,
}

fn main() -> Result<(), DashboardError> {
    init_logger();
    let args = Args::parse();

    let source = normalize_path(&args.path);
    if !source.is_file() {
        error!("Workbook not found: {}", source.display());
        return Err(DashboardError::Format(format!(
            "workbook not found: {}",
            source.display()
        )));
    }

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let layout = SheetLayout::new(&args.metadata_sheet);
    let mut session = DashboardSession::new(layout, LoadCache::new());
    let renderer = Renderer::new(!args.plain);
    let mut selection = Selection {
        ticker: args.ticker.clone(),
        period: args.period,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_dashboard(
        &mut session,
        &renderer,
        &source,
        &selection,
        today,
        args.chart_json.as_deref(),
        &mut out,
    )?;

    if !args.interactive {
        return Ok(());
    }

    info!("Interactive mode. Enter `<TICKER> [PERIOD]`, or `quit` to exit.");
    for line in io::stdin().lock().lines() {
        let line = line?;
        let Some(next) = parse_selection(&line, selection.period) else {
            break;
        };
        match next {
            Ok(next) => selection = next,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        }
        if let Err(e) = render_dashboard(
            &mut session,
            &renderer,
            &source,
            &selection,
            today,
            args.chart_json.as_deref(),
            &mut out,
        ) {
            error!("Render failed: {}", e);
        }
        out.flush()?;
    }
    info!("Dashboard stopping...");
    Ok(())
}

/// Runs the whole pipeline once and prints every widget.
fn render_dashboard(
    session: &mut DashboardSession,
    renderer: &Renderer,
    source: &Path,
    selection: &Selection,
    today: NaiveDate,
    chart_json: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    let dataset = session.dataset(source)?;
    let ticker = match &selection.ticker {
        Some(ticker) => ticker.clone(),
        None => dataset
            .watchlist
            .symbols()
            .next()
            .map(String::from)
            .ok_or_else(|| DashboardError::Format(String::from("workbook lists no tickers")))?,
    };
    let view = session.history_view(source, &ticker, selection.period, today)?;

    renderer.title(out)?;
    renderer.watchlist(out, &watchlist_rows(&dataset.watchlist))?;
    renderer.history(out, &view)?;
    renderer.overview(out, &overview_rows(&dataset.watchlist))?;

    if let Some(path) = chart_json {
        CandlestickChart::from_rows(&view.rows).write_json(path)?;
        info!("Chart spec for {} written to {}", ticker, path.display());
    }
    Ok(())
}

/// Parses an interactive command line.
///
/// Returns `None` to stop (`quit`, `exit`), `Some(Err)` for an unknown period, and
/// otherwise the new selection. The ticker is taken verbatim, like `--ticker`. A blank
/// line leaves the ticker choice empty, which falls back to the first listed ticker.
fn parse_selection(line: &str, current_period: Period) -> Option<Result<Selection>> {
    let mut parts = line.split_whitespace();
    let ticker = parts.next().map(String::from);
    if let Some(word) = &ticker {
        if word.eq_ignore_ascii_case("quit") || word.eq_ignore_ascii_case("exit") {
            return None;
        }
    }
    let period = match parts.next() {
        Some(raw) => match raw.parse::<Period>() {
            Ok(period) => period,
            Err(_) => {
                return Some(Err(DashboardError::Format(format!(
                    "unknown period {raw}; expected week, month, trimester or year"
                ))));
            }
        },
        None => current_period,
    };
    Some(Ok(Selection { ticker, period }))
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Strips surrounding whitespace and one pair of matching quotes from a CLI path,
/// so `"Stock Dashboard.xlsx"` pasted with its quotes still resolves.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|quote| trimmed.strip_prefix(*quote)?.strip_suffix(*quote))
        .unwrap_or(trimmed);
    PathBuf::from(unquoted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_keeps_period_when_omitted() {
        let next = parse_selection("AAPL", Period::Year).unwrap().unwrap();
        assert_eq!(next.ticker.as_deref(), Some("AAPL"));
        assert_eq!(next.period, Period::Year);

        let next = parse_selection("MSFT week", Period::Year).unwrap().unwrap();
        assert_eq!(next.period, Period::Week);
    }

    #[test]
    fn quit_and_bad_periods() {
        assert!(parse_selection("quit", Period::Week).is_none());
        assert!(parse_selection("EXIT", Period::Week).is_none());
        assert!(parse_selection("AAPL decade", Period::Week).unwrap().is_err());
        let blank = parse_selection("   ", Period::Month).unwrap().unwrap();
        assert_eq!(blank.ticker, None);
    }

    #[test]
    fn tickers_keep_their_case() {
        let next = parse_selection("brk.b month", Period::Year).unwrap().unwrap();
        assert_eq!(next.ticker.as_deref(), Some("brk.b"));
        assert_eq!(next.period, Period::Month);
    }

    #[test]
    fn quoted_paths_are_unwrapped() {
        assert_eq!(
            normalize_path(" \"Stock Dashboard.xlsx\" "),
            PathBuf::from("Stock Dashboard.xlsx")
        );
        assert_eq!(normalize_path("'book.xlsx'"), PathBuf::from("book.xlsx"));
        assert_eq!(normalize_path("\"half.xlsx"), PathBuf::from("\"half.xlsx"));
    }
}
