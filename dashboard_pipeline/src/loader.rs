//! Reading the dashboard workbook into raw tables.
//!
//! A workbook holds one metadata sheet (named `ticker` by default) and one history
//! sheet per ticker, named exactly like the symbol. `load` reads the metadata sheet,
//! collects the distinct symbols from its `Ticker` column and reads the matching
//! sheets. Cell values are converted to `Cell` without further interpretation;
//! typing happens in `normalize`.
//!
//! The `Workbook` trait is the seam between the pipeline and the file format:
//! `XlsxWorkbook` reads real files through calamine, `MemoryWorkbook` serves sheets
//! built in memory.
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use dashboard_common::model::{Cell, RawDataset, RawTable};
use dashboard_common::sheets::{self, SheetLayout};
use dashboard_common::LoadError;
use log::{debug, info};

use crate::normalize::normalize_column_name;

/// Source of named sheets.
pub trait Workbook {
    /// Names of all sheets in the workbook.
    fn sheet_names(&self) -> Vec<String>;

    /// Reads one sheet as a header row plus data rows.
    ///
    /// Returns `LoadError::MissingSheet` if no sheet is called `name`.
    fn sheet(&mut self, name: &str) -> Result<RawTable, LoadError>;
}

/// Spreadsheet file opened with calamine (xlsx, xlsm, xlsb, xls, ods).
pub struct XlsxWorkbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl XlsxWorkbook {
    /// Opens the workbook at `path`, detecting the format from the extension.
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        let sheets = open_workbook_auto(path).map_err(|e| LoadError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            sheets,
        })
    }
}

impl Workbook for XlsxWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn sheet(&mut self, name: &str) -> Result<RawTable, LoadError> {
        if !self.sheet_names().iter().any(|sheet| sheet == name) {
            return Err(LoadError::MissingSheet(String::from(name)));
        }
        debug!("Reading sheet {} from {}", name, self.path.display());
        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|e| LoadError::Read {
                sheet: String::from(name),
                reason: e.to_string(),
            })?;
        Ok(table_from_range(&range))
    }
}

/// Workbook whose sheets live in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: BTreeMap<String, RawTable>,
}

impl MemoryWorkbook {
    /// Creates an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the sheet called `name`.
    pub fn with_sheet(mut self, name: &str, table: RawTable) -> Self {
        self.sheets.insert(String::from(name), table);
        self
    }
}

impl Workbook for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.keys().cloned().collect()
    }

    fn sheet(&mut self, name: &str) -> Result<RawTable, LoadError> {
        self.sheets
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::MissingSheet(String::from(name)))
    }
}

/// Reads the metadata sheet and every history sheet it references.
///
/// Fails with `LoadError::MissingSheet` when the metadata sheet or a referenced
/// per-ticker sheet is absent, and with `LoadError::MissingColumn` when the metadata
/// sheet has no `Ticker` column. Sheets not referenced by the metadata are not read.
pub fn load<W: Workbook + ?Sized>(
    workbook: &mut W,
    layout: &SheetLayout,
) -> Result<RawDataset, LoadError> {
    let names = workbook.sheet_names();
    if !names.iter().any(|name| *name == layout.metadata_sheet) {
        return Err(LoadError::MissingSheet(layout.metadata_sheet.clone()));
    }

    let tickers = workbook.sheet(&layout.metadata_sheet)?;
    let ticker_column = tickers
        .columns
        .iter()
        .position(|column| normalize_column_name(column) == sheets::TICKER)
        .ok_or_else(|| LoadError::MissingColumn {
            sheet: layout.metadata_sheet.clone(),
            column: String::from(sheets::TICKER),
        })?;

    let mut histories = BTreeMap::new();
    for row in 0..tickers.rows.len() {
        let symbol = tickers.cell(row, ticker_column).as_label();
        if symbol.is_empty() || histories.contains_key(&symbol) {
            continue;
        }
        if !names.contains(&symbol) {
            return Err(LoadError::MissingSheet(symbol));
        }
        let history = workbook.sheet(&symbol)?;
        debug!("Sheet {}: {} rows", symbol, history.rows.len());
        histories.insert(symbol, history);
    }

    info!(
        "Loaded {} metadata rows and {} history sheets",
        tickers.rows.len(),
        histories.len()
    );
    Ok(RawDataset { tickers, histories })
}

/// Opens the spreadsheet at `path` and loads it with `layout`.
pub fn load_path(path: &Path, layout: &SheetLayout) -> Result<RawDataset, LoadError> {
    let mut workbook = XlsxWorkbook::open(path)?;
    load(&mut workbook, layout)
}

fn table_from_range(range: &Range<Data>) -> RawTable {
    let mut rows = range.rows();
    let columns = rows
        .next()
        .map(|header| header.iter().map(|cell| convert_cell(cell).as_label()).collect())
        .unwrap_or_default();
    let rows = rows
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();
    RawTable::new(columns, rows)
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Float(value) => Cell::Number(*value),
        Data::String(text) => Cell::Text(text.clone()),
        Data::Bool(value) => Cell::Bool(*value),
        Data::DateTime(value) => excel_serial_to_datetime(value.as_f64())
            .map(Cell::DateTime)
            .unwrap_or(Cell::Empty),
        Data::DateTimeIso(text) => iso_to_datetime(text)
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Text(text.clone())),
        Data::DurationIso(_) | Data::Error(_) | Data::Empty => Cell::Empty,
    }
}

/// Converts an Excel serial day number (day 0 = 1899-12-30) to a date-time.
pub(crate) fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}

fn iso_to_datetime(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: Vec<Vec<Cell>>) -> RawTable {
        RawTable::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    fn workbook() -> MemoryWorkbook {
        MemoryWorkbook::new()
            .with_sheet(
                "ticker",
                table(
                    &[" Ticker ", "Symbol Name"],
                    vec![
                        vec![Cell::from("AAPL"), Cell::from("Apple")],
                        vec![Cell::from("MSFT"), Cell::from("Microsoft")],
                        vec![Cell::from("AAPL"), Cell::from("Apple again")],
                        vec![Cell::Empty, Cell::Empty],
                    ],
                ),
            )
            .with_sheet("AAPL", table(&["Date"], vec![]))
            .with_sheet("MSFT", table(&["Date"], vec![]))
            .with_sheet("UNUSED", table(&["Date"], vec![]))
    }

    #[test]
    fn reads_only_referenced_sheets() {
        let raw = load(&mut workbook(), &SheetLayout::default()).unwrap();
        let keys: Vec<&str> = raw.histories.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["AAPL", "MSFT"]);
        assert_eq!(raw.tickers.rows.len(), 4);
    }

    #[test]
    fn missing_metadata_sheet_is_a_load_error() {
        let err = load(&mut workbook(), &SheetLayout::new("meta")).unwrap_err();
        assert!(matches!(err, LoadError::MissingSheet(ref name) if name == "meta"));
    }

    #[test]
    fn missing_ticker_sheet_is_a_load_error() {
        let mut book = workbook().with_sheet(
            "ticker",
            table(&["Ticker"], vec![vec![Cell::from("NVDA")]]),
        );
        let err = load(&mut book, &SheetLayout::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingSheet(ref name) if name == "NVDA"));
    }

    #[test]
    fn metadata_without_ticker_column_is_rejected() {
        let mut book = MemoryWorkbook::new().with_sheet("ticker", table(&["Symbol"], vec![]));
        let err = load(&mut book, &SheetLayout::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { ref column, .. } if column == "Ticker"));
    }

    #[test]
    fn excel_serials_map_to_calendar_dates() {
        let dt = excel_serial_to_datetime(45292.5).unwrap();
        assert_eq!(dt.to_string(), "2024-01-01 12:00:00");
        assert!(excel_serial_to_datetime(f64::NAN).is_none());
        assert!(excel_serial_to_datetime(-1.0).is_none());
    }

    #[test]
    fn calamine_values_convert_to_cells() {
        assert_eq!(convert_cell(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(convert_cell(&Data::String("x".into())), Cell::from("x"));
        assert_eq!(convert_cell(&Data::Empty), Cell::Empty);
        assert_eq!(
            convert_cell(&Data::DateTimeIso("2024-03-05".into())),
            Cell::DateTime(
                NaiveDate::from_ymd_opt(2024, 3, 5)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            )
        );
    }

    #[test]
    fn unreadable_file_is_an_open_error() {
        let err = load_path(Path::new("/nonexistent/book.xlsx"), &SheetLayout::default())
            .unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }
}
