//! Presentation models built from pipeline output.
//!
//! This module groups the display-ready types the renderer consumes:
//! - `watchlist`: ticker cards with price, change arrow and sparkline.
//! - `metrics`: formatted period statistics.
//! - `chart`: serializable candlestick/volume chart spec.
//! - `overview`: the per-ticker overview table.
pub mod chart;
pub mod metrics;
pub mod overview;
pub mod watchlist;
