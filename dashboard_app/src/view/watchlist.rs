//! Watchlist cards: one card per ticker, laid out in rows.
use dashboard_common::model::{TickerRecord, Watchlist};
use dashboard_common::sheets::WATCHLIST_COLUMNS;

use crate::format::{or_missing, sparkline, MISSING};

/// Direction of the daily change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Change is zero or positive.
    Up,
    /// Change is negative.
    Down,
}

impl Trend {
    /// Trend of `change_pct`; `None` when the change is missing.
    pub fn of(change_pct: Option<f64>) -> Option<Self> {
        change_pct.map(|change| if change >= 0.0 { Trend::Up } else { Trend::Down })
    }

    /// Arrow glyph shown next to the change.
    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "▲",
            Trend::Down => "▼",
        }
    }
}

/// Display-ready content of one watchlist card.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchlistCard {
    /// Ticker symbol.
    pub ticker: String,
    /// Display name.
    pub symbol_name: String,
    /// Current value, e.g. `$ 189.30`.
    pub price: String,
    /// Change with arrow, e.g. `▲ 1.20 %`.
    pub change: String,
    /// Change direction, used for coloring.
    pub trend: Option<Trend>,
    /// Sparkline of the recent opening prices.
    pub sparkline: String,
}

impl WatchlistCard {
    /// Builds the card for `record`.
    pub fn from_record(record: &TickerRecord) -> Self {
        let trend = Trend::of(record.change_pct);
        let change = match (trend, record.change_pct) {
            (Some(trend), Some(change)) => format!("{} {:.2} %", trend.arrow(), change),
            _ => String::from(MISSING),
        };
        Self {
            ticker: record.symbol.clone(),
            symbol_name: record.display_name.clone(),
            price: or_missing(record.last_price, |price| format!("$ {:.2}", price)),
            change,
            trend,
            sparkline: sparkline(&record.recent_opens),
        }
    }
}

/// Cards for every ticker, grouped into rows of [`WATCHLIST_COLUMNS`].
pub fn watchlist_rows(watchlist: &Watchlist) -> Vec<Vec<WatchlistCard>> {
    watchlist
        .records()
        .chunks(WATCHLIST_COLUMNS)
        .map(|chunk| chunk.iter().map(WatchlistCard::from_record).collect())
        .collect()
}
