//! Plain-text rendering of the dashboard widgets.
//!
//! Everything is written to a caller-supplied `Write`, so the same code prints to
//! stdout and into buffers in tests.
use std::io::Write;

use dashboard_common::Result;
use dashboard_pipeline::HistoryView;

use crate::view::metrics::MetricsPanel;
use crate::view::overview::{OverviewRow, RECENT_OPENS_HEADER};
use crate::view::watchlist::{Trend, WatchlistCard};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const CARD_WIDTH: usize = 28;

/// Text renderer with optional ANSI colors.
pub struct Renderer {
    color: bool,
}

impl Renderer {
    /// Create a renderer; `color = false` emits no escape sequences.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, style: &str) -> String {
        if self.color {
            format!("{style}{text}{RESET}")
        } else {
            String::from(text)
        }
    }

    fn tone(&self, text: &str, trend: Option<Trend>) -> String {
        match trend {
            Some(Trend::Up) => self.paint(text, GREEN),
            Some(Trend::Down) => self.paint(text, RED),
            None => String::from(text),
        }
    }

    /// Page title.
    pub fn title(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "{}", self.paint("Stocks Dashboard", BOLD))?;
        writeln!(out)?;
        Ok(())
    }

    /// Watchlist cards, one block of lines per row of cards.
    pub fn watchlist(&self, out: &mut impl Write, rows: &[Vec<WatchlistCard>]) -> Result<()> {
        for row in rows {
            let line = |cell: &dyn Fn(&WatchlistCard) -> String| -> String {
                row.iter()
                    .map(|card| pad(&cell(card), CARD_WIDTH))
                    .collect::<Vec<_>>()
                    .join(" | ")
            };
            writeln!(out, "{}", line(&|card| format!("{} ({})", card.symbol_name, card.ticker)))?;
            writeln!(out, "{}", line(&|card| self.tone(&card.change, card.trend)))?;
            writeln!(out, "{}", line(&|card| format!("Current Value {}", card.price)))?;
            writeln!(out, "{}", line(&|card| card.sparkline.clone()))?;
            writeln!(out)?;
        }
        Ok(())
    }

    /// History panel header and period metrics.
    pub fn history(&self, out: &mut impl Write, view: &HistoryView) -> Result<()> {
        writeln!(
            out,
            "{} - {} since {} ({} days)",
            self.paint(&view.ticker, BOLD),
            view.period,
            view.window_start,
            view.rows.len()
        )?;
        writeln!(out, "Period Metrics")?;
        for (label, value) in MetricsPanel::from_view(view).entries() {
            writeln!(out, "  {:<26}{}", label, value)?;
        }
        writeln!(out)?;
        Ok(())
    }

    /// Overview table with one line per ticker.
    pub fn overview(&self, out: &mut impl Write, rows: &[OverviewRow]) -> Result<()> {
        writeln!(
            out,
            "{:<8}{:<24}{:<18}{:>12}{:>10}{:>20}  {}",
            "Ticker", "Symbol Name", "Last Trade time", "Last Price", "Change", "Market Cap",
            RECENT_OPENS_HEADER
        )?;
        for row in rows {
            let change = format!("{:>10}", row.change_pct);
            write!(
                out,
                "{:<8}{:<24}{:<18}{:>12}{}{:>20}  {}",
                row.ticker,
                truncate(&row.symbol_name, 23),
                row.last_trade_time,
                row.last_price,
                self.tone(&change, row.trend),
                row.market_cap,
                row.recent_opens
            )?;
            for (name, value) in &row.extra {
                write!(out, "  {}={}", name, value)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

/// Right-pads `text` to `width` visible characters, ignoring ANSI escapes.
fn pad(text: &str, width: usize) -> String {
    let visible = visible_width(text);
    format!("{text}{}", " ".repeat(width.saturating_sub(visible)))
}

fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for c in text.chars() {
        match (in_escape, c) {
            (false, '\x1b') => in_escape = true,
            (true, 'm') => in_escape = false,
            (true, _) => {}
            (false, _) => width += 1,
        }
    }
    width
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        String::from(text)
    } else {
        let mut short: String = text.chars().take(max.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dashboard_common::model::SummaryStats;
    use dashboard_common::Period;

    fn card(ticker: &str, trend: Trend) -> WatchlistCard {
        WatchlistCard {
            ticker: ticker.to_string(),
            symbol_name: format!("{ticker} Inc"),
            price: "$ 10.00".to_string(),
            change: format!("{} 1.00 %", trend.arrow()),
            trend: Some(trend),
            sparkline: "▁█".to_string(),
        }
    }

    #[test]
    fn watchlist_lines_are_aligned_without_color() {
        let mut out = Vec::new();
        let rows = vec![vec![card("AAPL", Trend::Up), card("MSFT", Trend::Down)]];
        Renderer::new(false).watchlist(&mut out, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], format!("{:<28} | {:<28}", "AAPL Inc (AAPL)", "MSFT Inc (MSFT)"));
        assert!(lines[1].starts_with("▲ 1.00 %"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn colored_changes_follow_the_sign() {
        let mut out = Vec::new();
        let rows = vec![vec![card("MSFT", Trend::Down)]];
        Renderer::new(true).watchlist(&mut out, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\x1b[31m▼ 1.00 %\x1b[0m"));
    }

    #[test]
    fn history_panel_lists_every_metric() {
        let view = HistoryView {
            ticker: "AAPL".to_string(),
            period: Period::Week,
            window_start: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            rows: Vec::new(),
            stats: SummaryStats::default(),
            market_cap: Some(1_000.0),
        };
        let mut out = Vec::new();
        Renderer::new(false).history(&mut out, &view).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("AAPL - Week since 2024-01-03 (0 days)"));
        assert!(text.contains("Average Daily Volume      n/a"));
        assert!(text.contains("Current Market Cap        1,000 $"));
    }

    #[test]
    fn visible_width_skips_escapes() {
        assert_eq!(visible_width("\x1b[32m▲ 1 %\x1b[0m"), 5);
        assert_eq!(truncate("International Business", 8), "Interna…");
    }
}
