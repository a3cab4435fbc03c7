//! Trailing-window slicing and period statistics.
use chrono::{NaiveDate, TimeDelta};
use dashboard_common::model::{HistoryRow, HistoryTables, SummaryStats, Watchlist};
use dashboard_common::{DashboardError, Period, Result};

/// First day included in the `period` window ending at `today`.
pub fn window_start(period: Period, today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_signed(TimeDelta::days(period.days()))
        .unwrap_or(NaiveDate::MIN)
}

/// Rows of `rows` dated on or after `start`. `rows` must be sorted by date.
pub fn window(rows: &[HistoryRow], start: NaiveDate) -> &[HistoryRow] {
    let first = rows.partition_point(|row| row.date < start);
    &rows[first..]
}

/// The part of `ticker`'s history inside the `period` window ending at `today`,
/// in ascending date order. An empty window is not an error.
pub fn windowed_history<'a>(
    ticker: &str,
    period: Period,
    histories: &'a HistoryTables,
    today: NaiveDate,
) -> Result<&'a [HistoryRow]> {
    let table = histories
        .get(ticker)
        .ok_or_else(|| DashboardError::TickerNotFound(String::from(ticker)))?;
    Ok(window(table.rows(), window_start(period, today)))
}

/// Min/max/mean over the non-missing values of each field in `rows`.
pub fn summary_stats(rows: &[HistoryRow]) -> SummaryStats {
    let volume = Extent::over(rows.iter().map(|row| row.volume));
    let close = Extent::over(rows.iter().map(|row| row.close));
    SummaryStats {
        min_volume: volume.min,
        max_volume: volume.max,
        mean_volume: volume.mean(),
        min_close: close.min,
        max_close: close.max,
        observations: rows.len(),
    }
}

/// Market capitalization of `ticker`; `Ok(None)` if the value itself is missing.
pub fn market_cap(ticker: &str, watchlist: &Watchlist) -> Result<Option<f64>> {
    watchlist
        .get(ticker)
        .map(|record| record.market_cap)
        .ok_or_else(|| DashboardError::TickerNotFound(String::from(ticker)))
}

#[derive(Default)]
struct Extent {
    min: Option<f64>,
    max: Option<f64>,
    sum: f64,
    count: usize,
}

impl Extent {
    fn over(values: impl Iterator<Item = Option<f64>>) -> Self {
        values.flatten().fold(Self::default(), |mut acc, value| {
            acc.min = Some(acc.min.map_or(value, |m| m.min(value)));
            acc.max = Some(acc.max.map_or(value, |m| m.max(value)));
            acc.sum += value;
            acc.count += 1;
            acc
        })
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}
