//! Dual-Range Position
//!
//! Owns two concentrated-liquidity ranges plus the free token balances:
//!
//! - PRIMARY:   wide, symmetric around the current tick, re-minted every rebalance
//! - SECONDARY: narrow, directional, only minted when the token0 share of
//!              the leftover free balances leaves [delta_low, delta_high]
//!
//! Between rebalances a range's liquidity and bounds are frozen; its token
//! composition is recomputed from the current price every time it is read.
//! Swap fees accrue into per-range pending balances and are only folded back
//! into the free balances (and thus compounded) on the next burn.

use tracing::{debug, warn};

use super::error::{SimResult, SimulationError};
use super::range_math::{
    price_to_tick, tick_to_sqrt, token0_per_liquidity, token1_per_liquidity, tokens_in_range,
};

// ============================================
// RANGE
// ============================================

/// A concentrated-liquidity range with its pending fees
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub sqrt_lower: f64,
    pub sqrt_upper: f64,
    pub liquidity: f64,
    pub fees_owed0: f64,
    pub fees_owed1: f64,
}

impl Range {
    /// Empty range on `[tick_lower, tick_upper]`; rejects reversed bounds
    pub fn new(tick_lower: i32, tick_upper: i32, tick_spacing: u32) -> SimResult<Self> {
        if tick_lower > tick_upper {
            return Err(SimulationError::InvalidRange {
                lower: tick_lower,
                upper: tick_upper,
            });
        }

        Ok(Self {
            tick_lower,
            tick_upper,
            sqrt_lower: tick_to_sqrt(tick_lower, tick_spacing),
            sqrt_upper: tick_to_sqrt(tick_upper, tick_spacing),
            liquidity: 0.0,
            fees_owed0: 0.0,
            fees_owed1: 0.0,
        })
    }

    pub fn is_active(&self) -> bool {
        self.liquidity > 0.0
    }

    /// Price strictly inside the bounds
    pub fn contains(&self, sqrt_price: f64) -> bool {
        self.sqrt_lower < sqrt_price && sqrt_price < self.sqrt_upper
    }

    pub fn width_ticks(&self) -> i32 {
        self.tick_upper - self.tick_lower
    }

    /// Token composition at `sqrt_price`
    pub fn tokens_at(&self, sqrt_price: f64) -> (f64, f64) {
        tokens_in_range(self.liquidity, self.sqrt_lower, self.sqrt_upper, sqrt_price)
    }

    /// Accrue swap fees for a move from `prev_sqrt` to `sqrt_price`.
    ///
    /// Only the part of the swept interval inside the range earns fees:
    /// token0 when price fell, token1 when it rose.
    pub fn accrue_fees(&mut self, prev_sqrt: f64, sqrt_price: f64, pool_fee: f64) {
        if !self.is_active() || prev_sqrt == sqrt_price {
            return;
        }

        let p_min = prev_sqrt.min(sqrt_price).max(self.sqrt_lower);
        let p_max = prev_sqrt.max(sqrt_price).min(self.sqrt_upper);
        if p_min >= p_max {
            return;
        }

        if sqrt_price < prev_sqrt {
            self.fees_owed0 += pool_fee * self.liquidity * (1.0 / p_min - 1.0 / p_max);
        } else {
            self.fees_owed1 += pool_fee * self.liquidity * (p_max - p_min);
        }
    }

    /// Withdraw everything (composition + pending fees) at `sqrt_price`
    fn burn(&mut self, sqrt_price: f64) -> (f64, f64) {
        let (amount0, amount1) = self.tokens_at(sqrt_price);
        let out = (amount0 + self.fees_owed0, amount1 + self.fees_owed1);
        self.liquidity = 0.0;
        self.fees_owed0 = 0.0;
        self.fees_owed1 = 0.0;
        out
    }
}

// ============================================
// MINT OUTCOMES
// ============================================

/// Why a mint produced no liquidity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateReason {
    /// tick_lower == tick_upper
    ZeroWidth,
    /// Neither token is needed per unit of liquidity at this price
    ZeroDenominator,
    /// The constraining token balance is empty
    NoBalance,
}

impl std::fmt::Display for DegenerateReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegenerateReason::ZeroWidth => write!(f, "zero-width range"),
            DegenerateReason::ZeroDenominator => write!(f, "zero per-liquidity denominator"),
            DegenerateReason::NoBalance => write!(f, "no backing balance"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MintOutcome {
    Minted {
        liquidity: f64,
        amount0: f64,
        amount1: f64,
    },
    /// Zero liquidity minted, tokens stay free
    Degenerate(DegenerateReason),
}

impl MintOutcome {
    pub fn is_degenerate(&self) -> bool {
        matches!(self, MintOutcome::Degenerate(_))
    }
}

/// Which side of the price the secondary range sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Below price: token1-only, buys token0 on the way down
    Below,
    /// Above price: token0-only, sells token0 on the way up
    Above,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SecondaryOutcome {
    /// Composition within thresholds
    Inactive,
    /// Threshold breached but price already inside the previous bounds
    SkippedStale,
    Placed {
        placement: Placement,
        outcome: MintOutcome,
    },
}

/// What a rebalance did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RebalanceReport {
    pub center_tick: i32,
    /// Token0 share of the free balances left over by the previous mints
    pub delta: f64,
    pub primary: MintOutcome,
    pub secondary: SecondaryOutcome,
}

impl RebalanceReport {
    /// Number of degenerate mints in this rebalance
    pub fn degenerate_mints(&self) -> usize {
        let secondary = match self.secondary {
            SecondaryOutcome::Placed { outcome, .. } => outcome.is_degenerate() as usize,
            _ => 0,
        };
        self.primary.is_degenerate() as usize + secondary
    }
}

// ============================================
// POSITION
// ============================================

/// Range widths and composition thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeLayout {
    pub tick_spacing: u32,
    pub primary_half_width: i32,
    pub secondary_width: i32,
    pub delta_low: f64,
    pub delta_high: f64,
}

/// Primary + secondary range and the free balances backing them
#[derive(Debug, Clone, PartialEq)]
pub struct DualRangePosition {
    layout: RangeLayout,
    free0: f64,
    free1: f64,
    primary: Option<Range>,
    secondary: Option<Range>,
}

impl DualRangePosition {
    /// All capital starts uninvested
    pub fn new(layout: RangeLayout, token0: f64, token1: f64) -> Self {
        Self {
            layout,
            free0: token0,
            free1: token1,
            primary: None,
            secondary: None,
        }
    }

    pub fn free_balances(&self) -> (f64, f64) {
        (self.free0, self.free1)
    }

    pub fn primary(&self) -> Option<&Range> {
        self.primary.as_ref()
    }

    pub fn secondary(&self) -> Option<&Range> {
        self.secondary.as_ref()
    }

    /// Composition of (primary, secondary) at `sqrt_price`
    pub fn range_tokens(&self, sqrt_price: f64) -> [(f64, f64); 2] {
        let at = |r: &Option<Range>| r.as_ref().map_or((0.0, 0.0), |r| r.tokens_at(sqrt_price));
        [at(&self.primary), at(&self.secondary)]
    }

    /// Fees accrued since the last burn, summed over both ranges
    pub fn pending_fees(&self) -> (f64, f64) {
        [&self.primary, &self.secondary]
            .into_iter()
            .flatten()
            .fold((0.0, 0.0), |(f0, f1), r| (f0 + r.fees_owed0, f1 + r.fees_owed1))
    }

    /// Position value in token0 units (pending fees not included)
    pub fn value_in_token0(&self, sqrt_price: f64) -> f64 {
        let [r1, r2] = self.range_tokens(sqrt_price);
        self.free0 + r1.0 + r2.0 + (self.free1 + r1.1 + r2.1) / (sqrt_price * sqrt_price)
    }

    /// Token0 share of the free balances
    pub fn delta(&self, sqrt_price: f64) -> f64 {
        let total = self.free0 + self.free1 / (sqrt_price * sqrt_price);
        if total > 0.0 {
            self.free0 / total
        } else {
            0.5
        }
    }

    /// Accrue fees on both ranges for the move `prev_sqrt -> sqrt_price`
    pub fn accrue_fees(&mut self, prev_sqrt: f64, sqrt_price: f64, pool_fee: f64) {
        for range in [&mut self.primary, &mut self.secondary].into_iter().flatten() {
            range.accrue_fees(prev_sqrt, sqrt_price, pool_fee);
        }
    }

    /// Fold both ranges and their pending fees into the free balances
    pub fn burn(&mut self, sqrt_price: f64) {
        for range in [&mut self.primary, &mut self.secondary].into_iter().flatten() {
            let (amount0, amount1) = range.burn(sqrt_price);
            self.free0 += amount0;
            self.free1 += amount1;
        }
    }

    /// Burn, re-center the primary range, then place the secondary if needed.
    ///
    /// The secondary decision reads the leftover free balances before the
    /// burn: whatever the previous primary mint could not absorb.
    pub fn rebalance(&mut self, sqrt_price: f64) -> SimResult<RebalanceReport> {
        let delta = self.delta(sqrt_price);
        self.burn(sqrt_price);

        let layout = self.layout;
        let tick = price_to_tick(sqrt_price, layout.tick_spacing);

        // Primary: symmetric around the current tick
        let mut primary = Range::new(
            shift_down(tick, layout.primary_half_width)?,
            shift_up(tick, layout.primary_half_width)?,
            layout.tick_spacing,
        )?;
        let primary_outcome = self.mint_into(&mut primary, sqrt_price);
        self.primary = Some(primary);

        // Secondary: directional, adjacent to the current tick
        let placement = if delta < layout.delta_low {
            Some(Placement::Below)
        } else if delta > layout.delta_high {
            Some(Placement::Above)
        } else {
            None
        };
        let stale_contains = self
            .secondary
            .as_ref()
            .is_some_and(|r| r.contains(sqrt_price));

        let secondary_outcome = match placement {
            Some(_) if stale_contains => {
                self.secondary = None;
                SecondaryOutcome::SkippedStale
            }
            Some(placement) => {
                let (lower, upper) = match placement {
                    Placement::Below => {
                        let upper = shift_down(tick, 1)?;
                        (shift_down(upper, layout.secondary_width)?, upper)
                    }
                    Placement::Above => {
                        let lower = shift_up(tick, 1)?;
                        (lower, shift_up(lower, layout.secondary_width)?)
                    }
                };
                let mut secondary = Range::new(lower, upper, layout.tick_spacing)?;
                let outcome = self.mint_into(&mut secondary, sqrt_price);
                self.secondary = Some(secondary);
                SecondaryOutcome::Placed { placement, outcome }
            }
            None => {
                self.secondary = None;
                SecondaryOutcome::Inactive
            }
        };

        let report = RebalanceReport {
            center_tick: tick,
            delta,
            primary: primary_outcome,
            secondary: secondary_outcome,
        };
        debug!(
            "Rebalanced at tick {} (delta {:.4}): primary {:?}, secondary {:?}",
            tick, delta, report.primary, report.secondary
        );
        Ok(report)
    }

    /// Mint the largest liquidity the free balances can back into `range`.
    ///
    /// A token that the range does not need at this price puts no
    /// constraint on the mint, so ranges outside the price end up single-sided.
    fn mint_into(&mut self, range: &mut Range, sqrt_price: f64) -> MintOutcome {
        let outcome = self.size_mint(range, sqrt_price);

        match outcome {
            MintOutcome::Minted { liquidity, amount0, amount1 } => {
                range.liquidity = liquidity;
                self.free0 = (self.free0 - amount0).max(0.0);
                self.free1 = (self.free1 - amount1).max(0.0);
            }
            MintOutcome::Degenerate(reason) => {
                warn!(
                    "Degenerate mint on [{}, {}]: {} - tokens left uninvested",
                    range.tick_lower, range.tick_upper, reason
                );
            }
        }
        outcome
    }

    fn size_mint(&self, range: &Range, sqrt_price: f64) -> MintOutcome {
        if range.width_ticks() == 0 {
            return MintOutcome::Degenerate(DegenerateReason::ZeroWidth);
        }

        let per0 = token0_per_liquidity(range.sqrt_lower, range.sqrt_upper, sqrt_price);
        let per1 = token1_per_liquidity(range.sqrt_lower, range.sqrt_upper, sqrt_price);

        let mut liquidity = f64::INFINITY;
        if per0 > 0.0 && per0.is_finite() {
            liquidity = liquidity.min(self.free0 / per0);
        }
        if per1 > 0.0 && per1.is_finite() {
            liquidity = liquidity.min(self.free1 / per1);
        }

        if liquidity == f64::INFINITY {
            return MintOutcome::Degenerate(DegenerateReason::ZeroDenominator);
        }
        if !(liquidity > 0.0) || !liquidity.is_finite() {
            return MintOutcome::Degenerate(DegenerateReason::NoBalance);
        }

        MintOutcome::Minted {
            liquidity,
            amount0: liquidity * per0,
            amount1: liquidity * per1,
        }
    }
}

// Range bounds must stay inside the i32 tick domain

fn shift_up(tick: i32, by: i32) -> SimResult<i32> {
    tick.checked_add(by).ok_or_else(|| tick_overflow(format!("{} + {}", tick, by)))
}

fn shift_down(tick: i32, by: i32) -> SimResult<i32> {
    tick.checked_sub(by).ok_or_else(|| tick_overflow(format!("{} - {}", tick, by)))
}

fn tick_overflow(bound: String) -> SimulationError {
    SimulationError::InvalidConfig(format!("range bound {} overflows the tick domain", bound))
}
