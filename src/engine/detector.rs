//! Trend/Reversal Detector
//!
//! Lagging swing-high/swing-low tracker over sqrt prices.
//!
//! - `trend` is the extreme the last swing started from
//! - `reversal` is the running extreme of the current swing
//!
//! A move of more than `beta` (relative) away from `reversal` starts a new
//! swing. The swing distances feed the variable fee model as an
//! adverse-selection proxy.

/// Two-point swing reference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendState {
    pub trend: f64,
    pub reversal: f64,
}

/// Distance travelled since the last opposite swing, per quoting side
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SwingDistance {
    pub ask: f64,
    pub bid: f64,
}

impl TrendState {
    /// Both references start at the first observed sqrt price
    pub fn new(sqrt_price: f64) -> Self {
        Self {
            trend: sqrt_price,
            reversal: sqrt_price,
        }
    }

    /// No swing established yet
    pub fn is_flat(&self) -> bool {
        self.trend == self.reversal
    }

    /// Feed the next observation
    pub fn update(&mut self, sqrt_price: f64, beta: f64) {
        if (sqrt_price - self.reversal).abs() / sqrt_price > beta {
            self.trend = self.reversal;
            self.reversal = sqrt_price;
        } else if !self.strictly_between(sqrt_price) {
            self.reversal = sqrt_price;
        }
    }

    fn strictly_between(&self, sqrt_price: f64) -> bool {
        (self.trend > sqrt_price && sqrt_price > self.reversal)
            || (self.trend < sqrt_price && sqrt_price < self.reversal)
    }

    /// Ask/bid swing distances at `sqrt_price`
    pub fn swing_distance(&self, sqrt_price: f64) -> SwingDistance {
        if sqrt_price > self.trend {
            SwingDistance {
                ask: (sqrt_price - self.trend).abs(),
                bid: (self.reversal - sqrt_price).abs(),
            }
        } else if sqrt_price < self.trend {
            SwingDistance {
                ask: (sqrt_price - self.reversal).abs(),
                bid: (self.trend - sqrt_price).abs(),
            }
        } else {
            SwingDistance::default()
        }
    }
}
