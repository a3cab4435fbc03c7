use std::path::PathBuf;

use chrono::NaiveDate;
use dashboard_common::model::Cell;
use dashboard_common::{LoadError, Period, SheetLayout};
use dashboard_pipeline::{load_path, normalize, DashboardSession, LoadCache, Workbook, XlsxWorkbook};

/// `ticker` + `AAPL` sheets with native date cells, plus an unreferenced `Notes` sheet.
fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/dashboard.xlsx")
}

fn jan(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

fn header(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn xlsx_sheets_keep_headers_and_native_dates() {
    let raw = load_path(&fixture(), &SheetLayout::default()).unwrap();

    assert_eq!(
        raw.tickers.columns,
        header(&[
            "Ticker",
            "Symbol Name",
            "Last Trade time",
            "Last Price",
            "Change Pct",
            "Market Cap",
        ])
    );
    assert_eq!(
        raw.tickers.cell(0, 2),
        &Cell::DateTime(jan(5).and_hms_opt(16, 0, 0).unwrap())
    );

    let symbols: Vec<&str> = raw.histories.keys().map(String::as_str).collect();
    assert_eq!(symbols, vec!["AAPL"]);

    let aapl = &raw.histories["AAPL"];
    assert_eq!(aapl.columns, header(&["Date", "Open", "High", "Low", "Close", "Volume"]));
    assert_eq!(aapl.rows.len(), 4);
    assert_eq!(aapl.cell(0, 0), &Cell::DateTime(jan(2).and_hms_opt(0, 0, 0).unwrap()));
    assert_eq!(aapl.cell(0, 1), &Cell::Number(185.0));
    assert_eq!(aapl.cell(3, 0), &Cell::from("05/01/2024"));
}

#[test]
fn xlsx_workbook_lists_and_rejects_sheets() {
    let mut book = XlsxWorkbook::open(&fixture()).unwrap();
    assert_eq!(book.sheet_names(), vec!["ticker", "AAPL", "Notes"]);

    let err = book.sheet("MSFT").unwrap_err();
    assert!(matches!(err, LoadError::MissingSheet(ref name) if name == "MSFT"));
}

#[test]
fn xlsx_normalizes_mixed_date_cells() {
    let raw = load_path(&fixture(), &SheetLayout::default()).unwrap();
    let dataset = normalize(&raw).unwrap();

    let apple = dataset.watchlist.get("AAPL").unwrap();
    assert_eq!(apple.display_name, "Apple Inc.");
    assert_eq!(apple.last_trade_time, jan(5).and_hms_opt(16, 0, 0));
    assert_eq!(apple.market_cap, Some(2.95e12));
    assert_eq!(apple.recent_opens, vec![Some(185.0), Some(186.0), Some(187.0), Some(188.0)]);

    let dates: Vec<NaiveDate> = dataset.histories["AAPL"].rows().iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![jan(2), jan(3), jan(4), jan(5)]);
}

#[test]
fn session_reads_the_xlsx_once() {
    let mut session = DashboardSession::new(SheetLayout::default(), LoadCache::new());

    let week = session.history_view(&fixture(), "AAPL", Period::Week, jan(5)).unwrap();
    let again = session.history_view(&fixture(), "AAPL", Period::Week, jan(5)).unwrap();

    assert_eq!(week, again);
    assert_eq!(week.rows.len(), 4);
    assert_eq!(week.stats.mean_volume, Some(2500.0));
    assert_eq!(week.stats.max_close, Some(189.0));
    assert_eq!(session.cache().len(), 1);
}
