//! Reporting
//!
//! Responsible for:
//! - Summary statistics per run and across runs
//! - Console output of the comparison
//! - JSON export of the raw series

pub mod console;
pub mod export;
pub mod stats;

pub use export::{write_comparison, write_series, SeriesExport};
pub use stats::{Comparison, MarketSummary, RunSummary, SeriesStats};
