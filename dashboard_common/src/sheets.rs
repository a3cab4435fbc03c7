//! Workbook layout constants shared by the pipeline and the dashboard.
//!
//! Column names are given in their normalized form (see
//! `dashboard_pipeline::normalize::normalize_column_name`), so `"Symbol Name"` in a
//! header row matches [`SYMBOL_NAME`].

/// Default workbook file read when no path is given.
pub const DEFAULT_SOURCE: &str = "Stock Dashboard.xlsx";
/// Sheet holding one row of metadata per ticker.
pub const METADATA_SHEET: &str = "ticker";

/// Metadata column with the ticker symbol; also the name of its history sheet.
pub const TICKER: &str = "Ticker";
/// Metadata column with the company display name.
pub const SYMBOL_NAME: &str = "Symbol_Name";
/// Metadata column with the last trade timestamp.
pub const LAST_TRADE_TIME: &str = "Last_Trade_time";
/// Metadata column with the last traded price.
pub const LAST_PRICE: &str = "Last_Price";
/// Metadata column with the daily change in percent.
pub const CHANGE_PCT: &str = "Change_Pct";
/// Metadata column with the market capitalization.
pub const MARKET_CAP: &str = "Market_Cap";

/// History column with the trading day.
pub const DATE: &str = "Date";
/// History opening price column.
pub const OPEN: &str = "Open";
/// History high price column.
pub const HIGH: &str = "High";
/// History low price column.
pub const LOW: &str = "Low";
/// History closing price column.
pub const CLOSE: &str = "Close";
/// History traded volume column.
pub const VOLUME: &str = "Volume";

/// Number of trailing `Open` observations attached to every ticker record.
pub const RECENT_WINDOW: usize = 12;
/// Number of watchlist cards per rendered row.
pub const WATCHLIST_COLUMNS: usize = 4;

/// Names of the sheets the loader reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    /// Name of the metadata sheet.
    pub metadata_sheet: String,
}

impl SheetLayout {
    /// Layout with a custom metadata sheet name.
    pub fn new(metadata_sheet: &str) -> Self {
        Self {
            metadata_sheet: String::from(metadata_sheet),
        }
    }
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self::new(METADATA_SHEET)
    }
}
