//! Overview table: one row per ticker with every metadata column.
use dashboard_common::model::{TickerRecord, Watchlist};

use crate::format::{or_missing, sparkline, thousands, MISSING};
use crate::view::watchlist::Trend;

/// Header of the sparkline column.
pub const RECENT_OPENS_HEADER: &str = "Last 12 Months";

/// Display-ready overview row.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewRow {
    /// Ticker symbol.
    pub ticker: String,
    /// Display name.
    pub symbol_name: String,
    /// Last trade time, `dd/mm/yyyy HH:MM`.
    pub last_trade_time: String,
    /// Last price, `$ 12.34`.
    pub last_price: String,
    /// Change, `-1.20 %`.
    pub change_pct: String,
    /// Change direction, used for coloring.
    pub trend: Option<Trend>,
    /// Market capitalization with thousands separators.
    pub market_cap: String,
    /// Sparkline of the recent opening prices.
    pub recent_opens: String,
    /// Further metadata columns in name order.
    pub extra: Vec<(String, String)>,
}

impl OverviewRow {
    /// Builds the row for `record`.
    pub fn from_record(record: &TickerRecord) -> Self {
        Self {
            ticker: record.symbol.clone(),
            symbol_name: record.display_name.clone(),
            last_trade_time: record
                .last_trade_time
                .map(|time| time.format("%d/%m/%Y %H:%M").to_string())
                .unwrap_or_else(|| String::from(MISSING)),
            last_price: or_missing(record.last_price, |price| format!("$ {:.2}", price)),
            change_pct: or_missing(record.change_pct, |change| format!("{:.2} %", change)),
            trend: Trend::of(record.change_pct),
            market_cap: or_missing(record.market_cap, |cap| thousands(cap, 0)),
            recent_opens: sparkline(&record.recent_opens),
            extra: record
                .extra
                .iter()
                .map(|(name, value)| (name.clone(), or_missing(*value, |v| format!("{v}"))))
                .collect(),
        }
    }
}

/// Rows for every ticker in metadata order.
pub fn overview_rows(watchlist: &Watchlist) -> Vec<OverviewRow> {
    watchlist.records().iter().map(OverviewRow::from_record).collect()
}
