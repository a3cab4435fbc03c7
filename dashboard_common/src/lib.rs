//!
//! Common types and utilities shared by the dashboard pipeline and the app.
//!
//! This crate aggregates:
//! - `error`: `LoadError`, `NormalizeError` and the unified `DashboardError`.
//! - `result`: handy `Result<T, DashboardError>` alias.
//! - `model`: raw sheet cells and the normalized ticker/history records.
//! - `period`: trailing-window periods and their day counts.
//! - `sheets`: workbook layout constants (sheet and column names).
#![warn(missing_docs)]
pub mod error;
pub mod model;
pub mod period;
pub mod result;
pub mod sheets;

pub use error::{DashboardError, LoadError, NormalizeError};
pub use period::Period;
pub use result::Result;
pub use sheets::SheetLayout;
