//! One dashboard session: cached load, normalization and per-interaction views.
//!
//! A host (CLI, server, UI) creates a `DashboardSession` with an injected
//! `LoadCache` and calls it once per user interaction. Each call runs
//! load → normalize → aggregate; the load is served from the cache while the source
//! is unchanged, and the normalized dataset is reused as long as the cache returns
//! the same raw dataset.
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use dashboard_common::model::{Dataset, HistoryRow, RawDataset, SummaryStats};
use dashboard_common::{LoadError, Period, Result, SheetLayout};
use log::debug;

use crate::aggregate::{market_cap, summary_stats, window_start, windowed_history};
use crate::cache::LoadCache;
use crate::loader::load_path;
use crate::normalize::normalize;

/// Everything the history panel shows for one ticker and period.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryView {
    /// Selected ticker.
    pub ticker: String,
    /// Selected period.
    pub period: Period,
    /// First day of the window.
    pub window_start: NaiveDate,
    /// Rows inside the window, ascending by date.
    pub rows: Vec<HistoryRow>,
    /// Statistics over `rows`.
    pub stats: SummaryStats,
    /// Current market capitalization of the ticker.
    pub market_cap: Option<f64>,
}

impl HistoryView {
    /// Slices `dataset` for `ticker` over `period` ending at `today`.
    pub fn build(
        dataset: &Dataset,
        ticker: &str,
        period: Period,
        today: NaiveDate,
    ) -> Result<Self> {
        let rows = windowed_history(ticker, period, &dataset.histories, today)?;
        Ok(Self {
            ticker: String::from(ticker),
            period,
            window_start: window_start(period, today),
            rows: rows.to_vec(),
            stats: summary_stats(rows),
            market_cap: market_cap(ticker, &dataset.watchlist)?,
        })
    }
}

/// Pipeline state owned by a single session.
pub struct DashboardSession {
    layout: SheetLayout,
    cache: LoadCache,
    normalized: Option<(Arc<RawDataset>, Arc<Dataset>)>,
}

impl DashboardSession {
    /// Create a session reading workbooks laid out as `layout`.
    pub fn new(layout: SheetLayout, cache: LoadCache) -> Self {
        Self {
            layout,
            cache,
            normalized: None,
        }
    }

    /// The normalized dataset of the workbook at `path`.
    pub fn dataset(&mut self, path: &Path) -> Result<Arc<Dataset>> {
        self.dataset_with(path, load_path)
    }

    /// Like [`Self::dataset`] with a custom loader for cache misses.
    pub fn dataset_with<F>(&mut self, path: &Path, loader: F) -> Result<Arc<Dataset>>
    where
        F: FnOnce(&Path, &SheetLayout) -> Result<RawDataset, LoadError>,
    {
        let layout = &self.layout;
        let raw = self.cache.get_or_load(path, |source| loader(source, layout))?;

        if let Some((cached_raw, dataset)) = &self.normalized {
            if Arc::ptr_eq(cached_raw, &raw) {
                debug!("Reusing normalized dataset for {}", path.display());
                return Ok(Arc::clone(dataset));
            }
        }

        let dataset = Arc::new(normalize(&raw)?);
        self.normalized = Some((raw, Arc::clone(&dataset)));
        Ok(dataset)
    }

    /// History panel for `ticker` over `period` ending at `today`.
    pub fn history_view(
        &mut self,
        path: &Path,
        ticker: &str,
        period: Period,
        today: NaiveDate,
    ) -> Result<HistoryView> {
        let dataset = self.dataset(path)?;
        HistoryView::build(&dataset, ticker, period, today)
    }

    /// The session's load cache.
    pub fn cache(&self) -> &LoadCache {
        &self.cache
    }
}
