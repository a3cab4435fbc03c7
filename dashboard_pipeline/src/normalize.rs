//! Column normalization and type coercion.
//!
//! Turns the raw sheets read by `loader` into a typed `Dataset`:
//! - column names are trimmed and inner whitespace becomes `_`, on every table;
//! - date-like cells are parsed day-first, failures become `None`;
//! - numeric columns are coerced to `f64`, failures become `None`;
//! - each ticker gets the trailing `RECENT_WINDOW` opening prices attached.
//!
//! Only structural mismatches (missing columns, missing history tables, duplicate
//! symbols) are errors. A single unparseable value never aborts a load.
use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use dashboard_common::model::{
    Cell, Dataset, HistoryRow, HistoryTable, HistoryTables, RawDataset, RawTable, TickerRecord,
    Watchlist,
};
use dashboard_common::sheets::{self, RECENT_WINDOW};
use dashboard_common::NormalizeError;
use log::{debug, warn};

/// Day-first date layouts. Month-first text is never attempted.
const DAY_FIRST_DATES: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];
/// Year-first layout, unambiguous.
const ISO_DATE: &str = "%Y-%m-%d";
/// Optional time parts following a date, separated by a space (or `T` for ISO).
const TIMES: [&str; 3] = ["%H:%M:%S", "%H:%M:%S%.f", "%H:%M"];
/// `%Y` also accepts one to three digit years; text dates must carry all four.
const MIN_TEXT_YEAR: i32 = 1000;

/// Metadata columns that are not coerced into `TickerRecord::extra`.
const METADATA_COLUMNS: [&str; 6] = [
    sheets::TICKER,
    sheets::SYMBOL_NAME,
    sheets::LAST_TRADE_TIME,
    sheets::LAST_PRICE,
    sheets::CHANGE_PCT,
    sheets::MARKET_CAP,
];

/// Trims `name` and joins its whitespace-separated words with `_`.
pub fn normalize_column_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Parses a timestamp cell using the day-first convention.
///
/// Native spreadsheet date-times are taken as-is. Text is accepted in day-first form
/// (`31/01/2024`, `31-01-2024`, `31.01.2024`, optionally followed by a time) or in
/// ISO year-first form. Everything else, including month-first text such as
/// `01/31/2024` and two-digit years such as `31/01/24`, yields `None`.
pub fn parse_timestamp(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::DateTime(value) => Some(*value),
        Cell::Text(text) => {
            parse_timestamp_text(text.trim()).filter(|value| value.year() >= MIN_TEXT_YEAR)
        }
        _ => None,
    }
}

/// Calendar date of [`parse_timestamp`].
pub fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    parse_timestamp(cell).map(|value| value.date())
}

fn parse_timestamp_text(text: &str) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }
    for date in DAY_FIRST_DATES.iter().chain(std::iter::once(&ISO_DATE)) {
        if let Ok(day) = NaiveDate::parse_from_str(text, date) {
            return day.and_hms_opt(0, 0, 0);
        }
        for time in TIMES {
            if let Ok(value) = NaiveDateTime::parse_from_str(text, &format!("{date} {time}")) {
                return Some(value);
            }
            if *date == ISO_DATE {
                if let Ok(value) = NaiveDateTime::parse_from_str(text, &format!("{date}T{time}")) {
                    return Some(value);
                }
            }
        }
    }
    None
}

/// Coerces a cell to a finite number: numbers pass through, text is parsed after
/// trimming, anything else is `None`.
pub fn coerce_number(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Number(value) => *value,
        Cell::Text(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

/// Builds the typed dataset from raw sheets.
///
/// Every non-empty metadata row must carry a unique symbol with a matching history
/// table; otherwise the whole dataset is rejected. History tables that no metadata
/// row refers to are dropped.
pub fn normalize(raw: &RawDataset) -> Result<Dataset, NormalizeError> {
    let metadata = Columns::new(sheets::METADATA_SHEET, &raw.tickers);
    let ticker = metadata.require(sheets::TICKER)?;
    let symbol_name = metadata.require(sheets::SYMBOL_NAME)?;
    let last_trade_time = metadata.require(sheets::LAST_TRADE_TIME)?;
    let last_price = metadata.require(sheets::LAST_PRICE)?;
    let change_pct = metadata.require(sheets::CHANGE_PCT)?;
    let market_cap = metadata.require(sheets::MARKET_CAP)?;
    let extra_columns: Vec<(usize, &str)> = metadata
        .names
        .iter()
        .enumerate()
        .filter(|(_, name)| !METADATA_COLUMNS.contains(&name.as_str()))
        .map(|(index, name)| (index, name.as_str()))
        .collect();

    let mut records = Vec::new();
    let mut histories = HistoryTables::new();
    let mut seen = BTreeSet::new();

    for row in 0..raw.tickers.rows.len() {
        if raw.tickers.rows[row].iter().all(Cell::is_blank) {
            continue;
        }
        let symbol = raw.tickers.cell(row, ticker).as_label();
        if symbol.is_empty() {
            return Err(NormalizeError::MissingSymbol { row });
        }
        if !seen.insert(symbol.clone()) {
            return Err(NormalizeError::DuplicateTicker(symbol));
        }
        let raw_history = raw
            .histories
            .get(&symbol)
            .ok_or_else(|| NormalizeError::MissingHistory(symbol.clone()))?;
        let history = normalize_history(&symbol, raw_history)?;

        let cell = |column: usize| raw.tickers.cell(row, column);
        let extra: BTreeMap<String, Option<f64>> = extra_columns
            .iter()
            .map(|(index, name)| (String::from(*name), coerce_number(cell(*index))))
            .collect();

        records.push(TickerRecord {
            symbol: symbol.clone(),
            display_name: cell(symbol_name).as_label(),
            last_trade_time: parse_timestamp(cell(last_trade_time)),
            last_price: coerce_number(cell(last_price)),
            change_pct: coerce_number(cell(change_pct)),
            market_cap: coerce_number(cell(market_cap)),
            recent_opens: recent_opens(&history),
            extra,
        });
        histories.insert(symbol, history);
    }

    for orphan in raw.histories.keys().filter(|key| !seen.contains(*key)) {
        debug!("Dropping history sheet {} without metadata row", orphan);
    }

    Ok(Dataset {
        watchlist: Watchlist::new(records),
        histories,
    })
}

/// Normalizes one ticker's history sheet.
///
/// Rows whose date does not parse are dropped; the rest are sorted by date with the
/// last row winning on duplicate dates.
pub fn normalize_history(symbol: &str, raw: &RawTable) -> Result<HistoryTable, NormalizeError> {
    let columns = Columns::new(symbol, raw);
    let date = columns.require(sheets::DATE)?;
    let open = columns.require(sheets::OPEN)?;
    let high = columns.require(sheets::HIGH)?;
    let low = columns.require(sheets::LOW)?;
    let close = columns.require(sheets::CLOSE)?;
    let volume = columns.require(sheets::VOLUME)?;

    let mut rows = Vec::with_capacity(raw.rows.len());
    let mut dropped = 0usize;
    for row in 0..raw.rows.len() {
        if raw.rows[row].iter().all(Cell::is_blank) {
            continue;
        }
        let Some(day) = parse_date(raw.cell(row, date)) else {
            dropped += 1;
            continue;
        };
        let number = |column: usize| coerce_number(raw.cell(row, column));
        rows.push(HistoryRow {
            date: day,
            open: number(open),
            high: number(high),
            low: number(low),
            close: number(close),
            volume: number(volume),
        });
    }
    if dropped > 0 {
        warn!("{}: dropped {} rows with unparseable dates", symbol, dropped);
    }
    Ok(HistoryTable::from_rows(rows))
}

/// The trailing `RECENT_WINDOW` opening prices of `history`, most recent last.
pub fn recent_opens(history: &HistoryTable) -> Vec<Option<f64>> {
    let rows = history.rows();
    rows[rows.len().saturating_sub(RECENT_WINDOW)..]
        .iter()
        .map(|row| row.open)
        .collect()
}

struct Columns<'a> {
    table: &'a str,
    names: Vec<String>,
}

impl<'a> Columns<'a> {
    fn new(table: &'a str, raw: &RawTable) -> Self {
        Self {
            table,
            names: raw.columns.iter().map(|c| normalize_column_name(c)).collect(),
        }
    }

    fn require(&self, column: &str) -> Result<usize, NormalizeError> {
        self.names
            .iter()
            .position(|name| name == column)
            .ok_or_else(|| NormalizeError::MissingColumn {
                table: String::from(self.table),
                column: String::from(column),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn column_names_are_trimmed_and_joined() {
        assert_eq!(normalize_column_name("  Last Trade time "), "Last_Trade_time");
        assert_eq!(normalize_column_name("Symbol   Name"), "Symbol_Name");
        assert_eq!(normalize_column_name("Open"), "Open");
    }

    #[test]
    fn dates_parse_day_first() {
        assert_eq!(parse_date(&Cell::from("03/04/2024")), Some(ymd(2024, 4, 3)));
        assert_eq!(parse_date(&Cell::from("3-4-2024")), Some(ymd(2024, 4, 3)));
        assert_eq!(parse_date(&Cell::from("2024-04-03")), Some(ymd(2024, 4, 3)));
        assert_eq!(parse_date(&Cell::from(" 31.12.2023 ")), Some(ymd(2023, 12, 31)));
    }

    #[test]
    fn month_first_text_is_missing() {
        assert_eq!(parse_date(&Cell::from("04/13/2024")), None);
        assert_eq!(parse_date(&Cell::from("yesterday")), None);
        assert_eq!(parse_date(&Cell::Number(45292.0)), None);
        assert_eq!(parse_date(&Cell::Empty), None);
    }

    #[test]
    fn short_years_are_missing() {
        assert_eq!(parse_date(&Cell::from("03/04/24")), None);
        assert_eq!(parse_date(&Cell::from("03.04.999")), None);
        assert_eq!(parse_date(&Cell::from("24-04-03")), None);
        assert_eq!(parse_timestamp(&Cell::from("05/01/24 16:30")), None);
        assert_eq!(parse_date(&Cell::from("03/04/1000")), Some(ymd(1000, 4, 3)));
    }

    #[test]
    fn timestamps_keep_time_of_day() {
        let parsed = parse_timestamp(&Cell::from("05/01/2024 16:30")).unwrap();
        assert_eq!(parsed.to_string(), "2024-01-05 16:30:00");
        let iso = parse_timestamp(&Cell::from("2024-01-05T16:30:15")).unwrap();
        assert_eq!(iso.to_string(), "2024-01-05 16:30:15");
    }

    #[test]
    fn date_parsing_is_pure() {
        let cell = Cell::from("10/01/2024");
        let first = parse_date(&cell);
        for _ in 0..3 {
            assert_eq!(parse_date(&cell), first);
        }
    }

    #[test]
    fn numbers_coerce_or_go_missing() {
        assert_eq!(coerce_number(&Cell::Number(1.5)), Some(1.5));
        assert_eq!(coerce_number(&Cell::from(" 2.25 ")), Some(2.25));
        assert_eq!(coerce_number(&Cell::from("n/a")), None);
        assert_eq!(coerce_number(&Cell::from("NaN")), None);
        assert_eq!(coerce_number(&Cell::Number(f64::INFINITY)), None);
        assert_eq!(coerce_number(&Cell::Bool(true)), None);
    }

    #[test]
    fn history_drops_undated_rows_and_sorts() {
        let raw = RawTable::new(
            ["Date", "Open", "High", "Low", "Close", " Volume"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            vec![
                vec![Cell::from("02/01/2024"), Cell::from(2.0)],
                vec![Cell::from("garbage"), Cell::from(9.0)],
                vec![Cell::from("01/01/2024"), Cell::from("x"), Cell::from(1.0)],
                vec![],
            ],
        );
        let table = normalize_history("AAPL", &raw).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].date, ymd(2024, 1, 1));
        assert_eq!(table.rows()[0].open, None);
        assert_eq!(table.rows()[0].high, Some(1.0));
        assert_eq!(table.rows()[1].open, Some(2.0));
        assert_eq!(table.rows()[1].volume, None);
    }

    #[test]
    fn history_requires_ohlcv_columns() {
        let raw = RawTable::new(vec!["Date".into(), "Open".into()], vec![]);
        let err = normalize_history("AAPL", &raw).unwrap_err();
        assert_eq!(
            err,
            NormalizeError::MissingColumn {
                table: "AAPL".into(),
                column: "High".into()
            }
        );
    }
}
