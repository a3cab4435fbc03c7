//! Candlestick + volume chart specification.
//!
//! The dashboard does not draw charts itself; it emits a declarative spec that a
//! charting front end can render: a candlestick trace over the top 70% of the
//! figure and a volume bar trace over the bottom 30%, sharing the date axis.
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::NaiveDate;
use dashboard_common::model::HistoryRow;
use dashboard_common::Result;
use serde::Serialize;

const TITLE: &str = "Stock Price Trends";
const HEIGHT: u32 = 500;
const ROW_HEIGHTS: [f64; 2] = [0.7, 0.3];

/// OHLC trace; missing values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlestickTrace {
    /// Legend name.
    pub name: &'static str,
    /// Trading days.
    pub x: Vec<NaiveDate>,
    /// Opening prices.
    pub open: Vec<Option<f64>>,
    /// High prices.
    pub high: Vec<Option<f64>>,
    /// Low prices.
    pub low: Vec<Option<f64>>,
    /// Closing prices.
    pub close: Vec<Option<f64>>,
}

/// Bar trace of traded volume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    /// Legend name.
    pub name: &'static str,
    /// Trading days.
    pub x: Vec<NaiveDate>,
    /// Volumes.
    pub y: Vec<Option<f64>>,
}

/// Two-row chart with a shared x axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlestickChart {
    /// Figure title.
    pub title: &'static str,
    /// Figure height in pixels.
    pub height: u32,
    /// Relative heights of the price and volume rows.
    pub row_heights: [f64; 2],
    /// Hover mode shared across rows.
    pub hovermode: &'static str,
    /// Price row.
    pub price: CandlestickTrace,
    /// Volume row.
    pub volume: BarTrace,
}

impl CandlestickChart {
    /// Builds the chart from windowed history rows.
    pub fn from_rows(rows: &[HistoryRow]) -> Self {
        let x: Vec<NaiveDate> = rows.iter().map(|row| row.date).collect();
        let column = |field: fn(&HistoryRow) -> Option<f64>| -> Vec<Option<f64>> {
            rows.iter().map(field).collect()
        };
        Self {
            title: TITLE,
            height: HEIGHT,
            row_heights: ROW_HEIGHTS,
            hovermode: "x",
            price: CandlestickTrace {
                name: "Dollars",
                x: x.clone(),
                open: column(|row| row.open),
                high: column(|row| row.high),
                low: column(|row| row.low),
                close: column(|row| row.close),
            },
            volume: BarTrace {
                name: "Volume Traded",
                x,
                y: column(|row| row.volume),
            },
        }
    }

    /// Writes the chart as pretty-printed JSON to `path`.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_missing_values_as_null() {
        let rows = [HistoryRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: Some(1.0),
            high: Some(2.0),
            low: Some(0.5),
            close: None,
            volume: Some(10.0),
        }];
        let chart = CandlestickChart::from_rows(&rows);
        let json = serde_json::to_value(&chart).unwrap();

        assert_eq!(json["title"], "Stock Price Trends");
        assert_eq!(json["price"]["x"][0], "2024-01-02");
        assert!(json["price"]["close"][0].is_null());
        assert_eq!(json["volume"]["name"], "Volume Traded");
        assert_eq!(json["row_heights"][1], 0.3);
    }
}
