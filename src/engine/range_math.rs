//! Range Math
//!
//! Tick <-> sqrt-price conversions and token amounts held by a
//! concentrated-liquidity range.
//!
//! CONVENTION:
//! tick_to_sqrt(tick, spacing) = 1.0001^(tick * spacing / 2)
//!
//! So a "tick" here is an index in units of the pool's tick spacing,
//! already expressed in the sqrt domain.

// ============================================
// CONSTANTS
// ============================================

/// Price ratio between two adjacent raw ticks
pub const TICK_BASE: f64 = 1.0001;

/// Widest raw-tick span a range side may cover (`tick * spacing`)
pub const MAX_RAW_TICK: i64 = 887_272;

// ============================================
// CONVERSIONS
// ============================================

/// Sqrt price at the lower edge of `tick`
pub fn tick_to_sqrt(tick: i32, tick_spacing: u32) -> f64 {
    TICK_BASE.powf(tick as f64 * tick_spacing as f64 / 2.0)
}

/// Tick whose lower edge is at or below `sqrt_price`
pub fn price_to_tick(sqrt_price: f64, tick_spacing: u32) -> i32 {
    let step = TICK_BASE.powf(tick_spacing as f64 / 2.0).ln();
    (sqrt_price.ln() / step).floor() as i32
}

// ============================================
// TOKEN AMOUNTS
// ============================================

/// Token amounts `(token0, token1)` held by `liquidity` on `[sqrt_lower, sqrt_upper]`
/// at `sqrt_current`.
///
/// Below the range everything sits in token0, above it everything sits in token1.
pub fn tokens_in_range(
    liquidity: f64,
    sqrt_lower: f64,
    sqrt_upper: f64,
    sqrt_current: f64,
) -> (f64, f64) {
    if sqrt_current <= sqrt_lower {
        (liquidity * (1.0 / sqrt_lower - 1.0 / sqrt_upper), 0.0)
    } else if sqrt_current >= sqrt_upper {
        (0.0, liquidity * (sqrt_upper - sqrt_lower))
    } else {
        (
            liquidity * (1.0 / sqrt_current - 1.0 / sqrt_upper),
            liquidity * (sqrt_current - sqrt_lower),
        )
    }
}

/// Token0 needed per unit of liquidity when minting at `sqrt_current`
pub fn token0_per_liquidity(sqrt_lower: f64, sqrt_upper: f64, sqrt_current: f64) -> f64 {
    (1.0 / sqrt_current.max(sqrt_lower) - 1.0 / sqrt_upper).max(0.0)
}

/// Token1 needed per unit of liquidity when minting at `sqrt_current`
pub fn token1_per_liquidity(sqrt_lower: f64, sqrt_upper: f64, sqrt_current: f64) -> f64 {
    (sqrt_current.min(sqrt_upper) - sqrt_lower).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_tick_zero_is_unit_price() {
        assert_eq!(tick_to_sqrt(0, 10), 1.0);
        assert_eq!(price_to_tick(1.0, 10), 0);
    }

    #[test]
    fn test_tick_round_trip_within_one_spacing() {
        for &sqrt in &[0.0123, 0.5, 1.0, 1.7, 42.0, 1234.5] {
            for &spacing in &[1u32, 10, 60, 200] {
                let tick = price_to_tick(sqrt, spacing);
                let lower = tick_to_sqrt(tick, spacing);
                let upper = tick_to_sqrt(tick + 1, spacing);
                assert!(lower <= sqrt * (1.0 + EPS), "lower {} > sqrt {}", lower, sqrt);
                assert!(sqrt < upper * (1.0 + EPS), "sqrt {} >= upper {}", sqrt, upper);
            }
        }
    }

    #[test]
    fn test_tokens_continuous_at_lower_bound() {
        let (l, lo, hi) = (1_000.0, 0.9, 1.1);
        let inside = tokens_in_range(l, lo, hi, lo + 1e-12);
        let below = tokens_in_range(l, lo, hi, lo);
        assert!((inside.0 - below.0).abs() < 1e-6);
        assert!((inside.1 - below.1).abs() < 1e-6);
        assert_eq!(below.1, 0.0);
    }

    #[test]
    fn test_tokens_continuous_at_upper_bound() {
        let (l, lo, hi) = (1_000.0, 0.9, 1.1);
        let inside = tokens_in_range(l, lo, hi, hi - 1e-12);
        let above = tokens_in_range(l, lo, hi, hi);
        assert!((inside.0 - above.0).abs() < 1e-6);
        assert!((inside.1 - above.1).abs() < 1e-6);
        assert_eq!(above.0, 0.0);
    }

    #[test]
    fn test_per_liquidity_matches_tokens_in_range() {
        let (lo, hi, s) = (0.95, 1.05, 1.01);
        let (t0, t1) = tokens_in_range(1.0, lo, hi, s);
        assert!((token0_per_liquidity(lo, hi, s) - t0).abs() < EPS);
        assert!((token1_per_liquidity(lo, hi, s) - t1).abs() < EPS);
    }

    #[test]
    fn test_per_liquidity_single_sided() {
        // Range entirely above price holds only token0
        assert_eq!(token1_per_liquidity(1.1, 1.2, 1.0), 0.0);
        assert!(token0_per_liquidity(1.1, 1.2, 1.0) > 0.0);

        // Range entirely below price holds only token1
        assert_eq!(token0_per_liquidity(0.8, 0.9, 1.0), 0.0);
        assert!(token1_per_liquidity(0.8, 0.9, 1.0) > 0.0);
    }
}
