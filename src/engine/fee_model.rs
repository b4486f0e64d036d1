//! Fee Model
//!
//! Ask/bid quoting fee rates under one of two policies:
//!
//! - FIXED:    ask = bid = rate_bps / 10_000
//! - VARIABLE: fee = theta + alpha * (volume / (2 * L) + swing) / sqrt_price
//!
//! The variable formula grows with flow intensity and with the distance
//! travelled since the last opposite swing (toxicity signal). Every quoted
//! rate is clamped into [0, fee_cap].

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::detector::SwingDistance;

// ============================================
// POLICY
// ============================================

/// Fee policy, selected once per run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeePolicy {
    /// Constant fee on both sides
    Fixed { rate_bps: f64 },

    /// Flow- and swing-sensitive fee
    Variable { theta: f64, alpha: f64, volume: f64 },
}

impl FeePolicy {
    /// Short label used in reports and file names
    pub fn label(&self) -> String {
        match self {
            FeePolicy::Fixed { rate_bps } => format!("fixed_{}bps", rate_bps),
            FeePolicy::Variable { alpha, .. } => format!("variable_a{}", alpha),
        }
    }
}

impl std::fmt::Display for FeePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeePolicy::Fixed { rate_bps } => write!(f, "Fixed ({} bps)", rate_bps),
            FeePolicy::Variable { theta, alpha, volume } => {
                write!(f, "Variable (θ={}, α={}, vol={:.2e})", theta, alpha, volume)
            }
        }
    }
}

// ============================================
// QUOTES
// ============================================

/// Fee rates quoted for one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeQuote {
    pub ask: f64,
    pub bid: f64,
    /// At least one side hit the [0, fee_cap] clamp
    pub clamped: bool,
}

impl FeeQuote {
    /// Ask quote: price marked up by the ask fee
    pub fn ask_price(&self, price: f64) -> f64 {
        price * (1.0 + self.ask)
    }

    /// Bid quote: price marked down by the bid fee
    pub fn bid_price(&self, price: f64) -> f64 {
        price / (1.0 + self.bid)
    }

    /// Pool fee charged on a move from `prev_sqrt` to `sqrt_price`
    pub fn pool_fee(&self, prev_sqrt: f64, sqrt_price: f64) -> f64 {
        if sqrt_price > prev_sqrt {
            self.ask
        } else {
            self.bid
        }
    }
}

/// Evaluates a `FeePolicy` against the current market state
#[derive(Debug, Clone, Copy)]
pub struct FeeModel {
    policy: FeePolicy,
    fee_cap: f64,
}

impl FeeModel {
    pub fn new(policy: FeePolicy, fee_cap: f64) -> Self {
        Self { policy, fee_cap }
    }

    pub fn policy(&self) -> FeePolicy {
        self.policy
    }

    /// Quote ask/bid rates at `sqrt_price` given active pool liquidity and swing distances
    pub fn quote(&self, sqrt_price: f64, active_liquidity: f64, swing: SwingDistance) -> FeeQuote {
        let (ask, bid) = match self.policy {
            FeePolicy::Fixed { rate_bps } => {
                let rate = rate_bps / 10_000.0;
                (rate, rate)
            }
            FeePolicy::Variable { theta, alpha, volume } => {
                // No active liquidity: no flow term rather than a division fault
                let flow = if active_liquidity > 0.0 {
                    volume / (2.0 * active_liquidity)
                } else {
                    0.0
                };
                (
                    theta + alpha * (flow + swing.ask) / sqrt_price,
                    theta + alpha * (flow + swing.bid) / sqrt_price,
                )
            }
        };

        let (ask_c, bid_c) = (self.clamp(ask), self.clamp(bid));
        let clamped = ask_c != ask || bid_c != bid;
        if clamped {
            trace!("Fee clamped: ask {:.6} -> {:.6}, bid {:.6} -> {:.6}", ask, ask_c, bid, bid_c);
        }

        FeeQuote {
            ask: ask_c,
            bid: bid_c,
            clamped,
        }
    }

    fn clamp(&self, rate: f64) -> f64 {
        if rate.is_nan() {
            return rate;
        }
        rate.clamp(0.0, self.fee_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variable(theta: f64, alpha: f64, volume: f64) -> FeeModel {
        FeeModel::new(FeePolicy::Variable { theta, alpha, volume }, 0.99)
    }

    #[test]
    fn test_fixed_ignores_state() {
        let model = FeeModel::new(FeePolicy::Fixed { rate_bps: 5.0 }, 0.99);
        let a = model.quote(1.0, 1e6, SwingDistance { ask: 0.3, bid: 0.0 });
        let b = model.quote(7.0, 0.0, SwingDistance::default());
        assert_eq!(a, b);
        assert!((a.ask - 0.0005).abs() < 1e-15);
        assert!(!a.clamped);
    }

    #[test]
    fn test_variable_formula() {
        let model = variable(0.0003, 1.0, 100.0);
        let quote = model.quote(2.0, 1_000.0, SwingDistance { ask: 0.02, bid: 0.0 });
        // flow = 100 / 2000 = 0.05
        assert!((quote.ask - (0.0003 + (0.05 + 0.02) / 2.0)).abs() < 1e-12);
        assert!((quote.bid - (0.0003 + 0.05 / 2.0)).abs() < 1e-12);
        assert!(quote.ask > quote.bid);
    }

    #[test]
    fn test_variable_zero_liquidity_no_fault() {
        let model = variable(0.0003, 1.0, 1e11);
        let quote = model.quote(1.0, 0.0, SwingDistance::default());
        assert!(quote.ask.is_finite());
        assert!((quote.ask - 0.0003).abs() < 1e-15);
    }

    #[test]
    fn test_variable_clamped_to_cap() {
        let model = variable(0.0, 1.0, 1e12);
        let quote = model.quote(1.0, 1.0, SwingDistance::default());
        assert_eq!(quote.ask, 0.99);
        assert!(quote.clamped);
    }

    #[test]
    fn test_negative_rate_clamped_to_zero() {
        let model = variable(-0.5, 0.0, 0.0);
        let quote = model.quote(1.0, 1.0, SwingDistance::default());
        assert_eq!(quote.ask, 0.0);
        assert_eq!(quote.bid, 0.0);
        assert!(quote.clamped);
    }

    #[test]
    fn test_quotes_bracket_price() {
        let quote = FeeQuote { ask: 0.0005, bid: 0.0005, clamped: false };
        assert!((quote.ask_price(4.0) - 4.002).abs() < 1e-12);
        assert!((quote.bid_price(4.0) - 4.0 / 1.0005).abs() < 1e-12);
    }

    #[test]
    fn test_pool_fee_side_follows_direction() {
        let quote = FeeQuote { ask: 0.01, bid: 0.02, clamped: false };
        assert_eq!(quote.pool_fee(1.0, 1.1), 0.01);
        assert_eq!(quote.pool_fee(1.1, 1.0), 0.02);
        assert_eq!(quote.pool_fee(1.0, 1.0), 0.02);
    }
}
