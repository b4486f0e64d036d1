//! Anti-toxicity fee backtester
//!
//! Replays a concentrated-liquidity pool's sqrt-price / active-liquidity
//! history through a dual-range LP position and compares a fixed quoting fee
//! against a flow- and swing-sensitive variable fee.

pub mod config;
pub mod engine;
pub mod market;
pub mod report;
