//! Raw and normalized data model of the dashboard.
//!
//! Raw types (`Cell`, `RawTable`, `RawDataset`) mirror what a workbook sheet holds
//! before any interpretation. Normalized types (`TickerRecord`, `HistoryRow`,
//! `Dataset`) are built once per load and treated as immutable afterwards. Every
//! numeric field is an `Option<f64>`: `None` means the source value was missing or
//! could not be coerced, which is distinct from zero.
use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A single spreadsheet value as read from a sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Blank cell, error cell, or a trailing cell past the end of a ragged row.
    #[default]
    Empty,
    /// Text as stored in the sheet.
    Text(String),
    /// Numeric value (integers are widened to `f64`).
    Number(f64),
    /// Boolean value.
    Bool(bool),
    /// Date or date-time value stored natively by the spreadsheet.
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Returns `true` for blank cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Text rendering used for identifier columns (symbol, display name).
    pub fn as_label(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(text) => text.trim().to_string(),
            Cell::Number(value) if value.fract() == 0.0 => format!("{}", *value as i64),
            Cell::Number(value) => value.to_string(),
            Cell::Bool(value) => value.to_string(),
            Cell::DateTime(value) => value.to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(String::from(value))
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// A sheet as a header row plus data rows. Rows may be shorter than the header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    /// Header cells as text, exactly as written in the sheet.
    pub columns: Vec<String>,
    /// Data rows below the header.
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Creates a table from a header and its data rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    /// Index of the first column whose name equals `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Cell at `(row, column)`, or `Cell::Empty` past the end of a ragged row.
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(EMPTY)
    }
}

/// Everything the loader read: the metadata sheet and one raw sheet per ticker.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawDataset {
    /// The metadata sheet.
    pub tickers: RawTable,
    /// Per-ticker history sheets keyed by sheet name (the ticker symbol).
    pub histories: BTreeMap<String, RawTable>,
}

/// One ticker's metadata with its recent opening prices attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerRecord {
    /// Unique ticker symbol (e.g., `AAPL`).
    pub symbol: String,
    /// Company or instrument display name.
    pub display_name: String,
    /// Time of the last trade, if it parsed.
    pub last_trade_time: Option<NaiveDateTime>,
    /// Last traded price.
    pub last_price: Option<f64>,
    /// Daily change in percent.
    pub change_pct: Option<f64>,
    /// Market capitalization.
    pub market_cap: Option<f64>,
    /// Trailing `Open` values in date order, most recent last.
    pub recent_opens: Vec<Option<f64>>,
    /// Any further metadata columns, coerced to numbers.
    pub extra: BTreeMap<String, Option<f64>>,
}

/// One trading day of a ticker's history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistoryRow {
    /// Trading day.
    pub date: NaiveDate,
    /// Opening price.
    pub open: Option<f64>,
    /// Highest price.
    pub high: Option<f64>,
    /// Lowest price.
    pub low: Option<f64>,
    /// Closing price.
    pub close: Option<f64>,
    /// Traded volume.
    pub volume: Option<f64>,
}

/// A ticker's history with strictly increasing dates.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HistoryTable {
    rows: Vec<HistoryRow>,
}

impl HistoryTable {
    /// Builds a table from rows, sorting by date. On duplicate dates the row that
    /// came last in `rows` is kept.
    pub fn from_rows(mut rows: Vec<HistoryRow>) -> Self {
        // stable sort keeps input order among equal dates
        rows.sort_by_key(|row| row.date);
        let mut deduped: Vec<HistoryRow> = Vec::with_capacity(rows.len());
        for row in rows {
            match deduped.last_mut() {
                Some(last) if last.date == row.date => *last = row,
                _ => deduped.push(row),
            }
        }
        Self { rows: deduped }
    }

    /// All rows in ascending date order.
    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    /// Number of trading days.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// History tables keyed by ticker symbol.
pub type HistoryTables = BTreeMap<String, HistoryTable>;

/// Ticker records in the order they appear in the metadata sheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Watchlist {
    records: Vec<TickerRecord>,
}

impl Watchlist {
    /// Wraps records that already have unique symbols.
    pub fn new(records: Vec<TickerRecord>) -> Self {
        Self { records }
    }

    /// Record for `symbol`, if present.
    pub fn get(&self, symbol: &str) -> Option<&TickerRecord> {
        self.records.iter().find(|record| record.symbol == symbol)
    }

    /// All records in metadata order.
    pub fn records(&self) -> &[TickerRecord] {
        &self.records
    }

    /// Symbols in metadata order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.symbol.as_str())
    }
}

/// A fully normalized load: every watchlist symbol has exactly one history table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    /// Ticker metadata.
    pub watchlist: Watchlist,
    /// Per-ticker history.
    pub histories: HistoryTables,
}

/// Statistics over one window of history. `None` means every value of the field
/// was missing in the window, which is not the same as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SummaryStats {
    /// Lowest traded volume.
    pub min_volume: Option<f64>,
    /// Highest traded volume.
    pub max_volume: Option<f64>,
    /// Arithmetic mean of traded volume.
    pub mean_volume: Option<f64>,
    /// Lowest closing price.
    pub min_close: Option<f64>,
    /// Highest closing price.
    pub max_close: Option<f64>,
    /// Number of rows in the window, including rows with missing values.
    pub observations: usize,
}
