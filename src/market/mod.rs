//! Market Data
//!
//! Responsible for:
//! - Reading per-block pool history (sqrt price, active liquidity)
//! - Restricting it to a date window and checking it before a run
//! - Generating seeded synthetic histories in the same format

pub mod dataset;
pub mod synthetic;

pub use dataset::{dataset_path, normalize_pool_address, PoolRecord, PoolSeries, DATE_FORMAT};
pub use synthetic::{random_walk, WalkParams};
