//!
//! Load → normalize → aggregate pipeline behind the stocks dashboard.
//!
//! - `loader`: reads the metadata sheet and the per-ticker sheets of a workbook.
//! - `cache`: memoizes loads by source fingerprint (path, size, mtime).
//! - `normalize`: column-name normalization, day-first dates, numeric coercion.
//! - `aggregate`: trailing windows, period statistics, market cap lookup.
//! - `session`: explicit per-interaction entry points for a host application.
#![warn(missing_docs)]
pub mod aggregate;
pub mod cache;
pub mod loader;
pub mod normalize;
pub mod session;

pub use aggregate::{market_cap, summary_stats, windowed_history};
pub use cache::{LoadCache, SourceFingerprint};
pub use loader::{load, load_path, MemoryWorkbook, Workbook, XlsxWorkbook};
pub use normalize::normalize;
pub use session::{DashboardSession, HistoryView};
