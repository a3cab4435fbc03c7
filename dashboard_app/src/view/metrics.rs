//! Period metrics panel shown next to the price chart.
use dashboard_pipeline::HistoryView;

use crate::format::{or_missing, thousands};

/// Formatted period metrics. Missing statistics render as `n/a`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsPanel {
    /// Lowest daily volume in the window.
    pub lowest_volume: String,
    /// Lowest close in the window.
    pub lowest_close: String,
    /// Highest daily volume in the window.
    pub highest_volume: String,
    /// Highest close in the window.
    pub highest_close: String,
    /// Mean daily volume in the window.
    pub average_volume: String,
    /// Current market capitalization.
    pub market_cap: String,
}

impl MetricsPanel {
    /// Formats the statistics of `view`.
    pub fn from_view(view: &HistoryView) -> Self {
        let volume = |value: Option<f64>| or_missing(value, |v| thousands(v, 0));
        let dollars = |value: Option<f64>, decimals: usize| {
            or_missing(value, |v| format!("{} $", thousands(v, decimals)))
        };
        let stats = &view.stats;
        Self {
            lowest_volume: volume(stats.min_volume),
            lowest_close: dollars(stats.min_close, 2),
            highest_volume: volume(stats.max_volume),
            highest_close: dollars(stats.max_close, 2),
            average_volume: volume(stats.mean_volume),
            market_cap: dollars(view.market_cap, 0),
        }
    }

    /// Label/value pairs in display order.
    pub fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("Lowest Volume Day Trade", self.lowest_volume.as_str()),
            ("Lowest Close Price", self.lowest_close.as_str()),
            ("Highest Volume Day Trade", self.highest_volume.as_str()),
            ("Highest Close Price", self.highest_close.as_str()),
            ("Average Daily Volume", self.average_volume.as_str()),
            ("Current Market Cap", self.market_cap.as_str()),
        ]
    }
}
