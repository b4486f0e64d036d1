//! Synthetic pool history
//!
//! Seeded multiplicative random walk on the sqrt price with noisy active
//! liquidity. Produces datasets in the same format as real pool history so
//! the whole pipeline can run without an archive node.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::dataset::{PoolRecord, PoolSeries};

#[derive(Debug, Clone, PartialEq)]
pub struct WalkParams {
    pub blocks: usize,
    pub first_block: u64,
    /// Unix seconds of the first record
    pub start_timestamp: i64,
    /// Seconds between consecutive records
    pub block_time: i64,
    pub initial_sqrt_price: f64,
    /// Max relative sqrt-price move per block
    pub volatility: f64,
    pub base_liquidity: f64,
    /// Relative liquidity noise per block
    pub liquidity_noise: f64,
    /// Chance a block reports zero active liquidity
    pub empty_liquidity_prob: f64,
    pub seed: u64,
}

impl Default for WalkParams {
    fn default() -> Self {
        Self {
            blocks: 50_000,
            first_block: 400_000_000,
            // 18-11-2025 00:00 UTC
            start_timestamp: 1_763_424_000,
            block_time: 1,
            initial_sqrt_price: 0.0167,
            volatility: 0.0005,
            base_liquidity: 5e18,
            liquidity_noise: 0.2,
            empty_liquidity_prob: 0.0,
            seed: 42,
        }
    }
}

/// Deterministic for a given `params.seed`
pub fn random_walk(pool: &str, params: &WalkParams) -> PoolSeries {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut sqrt_price = params.initial_sqrt_price;
    let volatility = params.volatility.abs();
    let noise = params.liquidity_noise.abs();
    let empty_prob = params.empty_liquidity_prob.clamp(0.0, 1.0);

    let records = (0..params.blocks)
        .map(|i| {
            if i > 0 {
                sqrt_price *= 1.0 + rng.gen_range(-volatility..=volatility);
            }
            let liquidity = if rng.gen_bool(empty_prob) {
                0.0
            } else {
                (params.base_liquidity * (1.0 + rng.gen_range(-noise..=noise))).max(0.0)
            };
            PoolRecord {
                block: params.first_block + i as u64,
                timestamp: params.start_timestamp + i as i64 * params.block_time,
                sqrt_price,
                liquidity,
            }
        })
        .collect();

    PoolSeries::new(pool, records)
}
