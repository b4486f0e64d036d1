//! Simulation Engine
//!
//! Strict sequential fold over the price series. Point 0 seeds the detector,
//! the initial allocation and the baseline; point 1 seeds the previous-price
//! reference. Every later point produces exactly one output entry:
//!
//! 1. detector update
//! 2. fee quote (ask/bid) under the run's policy
//! 3. fee accrual for the move prev -> current
//! 4. portfolio value vs buy-and-hold baseline -> P&L ratio
//! 5. rebalance when `index % cadence == 0`
//!
//! The engine holds only immutable parameters; all mutable state lives in
//! `SimulationState` and is moved through `step`.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::detector::TrendState;
use super::error::{SimResult, SimulationError};
use super::fee_model::{FeeModel, FeePolicy};
use super::position::{DualRangePosition, RangeLayout, RebalanceReport};
use super::range_math::MAX_RAW_TICK;

// ============================================
// PARAMETERS
// ============================================

/// Everything one run needs besides the input series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Relative move that starts a new swing
    pub beta: f64,
    pub tick_spacing: u32,
    pub fee_policy: FeePolicy,
    /// Upper clamp for any quoted fee rate
    pub fee_cap: f64,
    /// Rebalance when input index % cadence == 0
    pub rebalance_cadence: usize,
    pub primary_half_width_ticks: i32,
    pub secondary_width_ticks: i32,
    pub delta_low: f64,
    pub delta_high: f64,
    /// Starting capital in token0 units
    pub initial_value: f64,
    /// Token0 share of the starting capital
    pub initial_delta: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            beta: 0.0045,
            tick_spacing: 10,
            fee_policy: FeePolicy::Fixed { rate_bps: 5.0 },
            fee_cap: 0.99,
            rebalance_cadence: 10,
            primary_half_width_ticks: 1000,
            secondary_width_ticks: 10,
            delta_low: 0.49,
            delta_high: 0.59,
            initial_value: 2e18,
            initial_delta: 0.5,
        }
    }
}

impl SimulationParams {
    /// Same parameters under another fee policy
    pub fn with_policy(&self, fee_policy: FeePolicy) -> Self {
        Self {
            fee_policy,
            ..self.clone()
        }
    }

    pub fn range_layout(&self) -> RangeLayout {
        RangeLayout {
            tick_spacing: self.tick_spacing,
            primary_half_width: self.primary_half_width_ticks,
            secondary_width: self.secondary_width_ticks,
            delta_low: self.delta_low,
            delta_high: self.delta_high,
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        let bad = |msg: String| Err(SimulationError::InvalidConfig(msg));

        if !(self.beta > 0.0 && self.beta < 1.0) {
            return bad(format!("beta must be in (0, 1), got {}", self.beta));
        }
        if self.tick_spacing == 0 {
            return bad("tick_spacing must be > 0".to_string());
        }
        if self.rebalance_cadence == 0 {
            return bad("rebalance_cadence must be > 0".to_string());
        }
        if self.primary_half_width_ticks <= 0 {
            return bad(format!(
                "primary_half_width_ticks must be > 0, got {}",
                self.primary_half_width_ticks
            ));
        }
        if self.secondary_width_ticks <= 0 {
            return bad(format!(
                "secondary_width_ticks must be > 0, got {}",
                self.secondary_width_ticks
            ));
        }
        // Keeps every range bound's sqrt price finite and non-zero
        let max_width = MAX_RAW_TICK / self.tick_spacing as i64;
        for (name, width) in [
            ("primary_half_width_ticks", self.primary_half_width_ticks),
            ("secondary_width_ticks", self.secondary_width_ticks),
        ] {
            if width as i64 > max_width {
                return bad(format!(
                    "{} must be <= {} at tick spacing {}, got {}",
                    name, max_width, self.tick_spacing, width
                ));
            }
        }
        if !(0.0 < self.delta_low && self.delta_low < self.delta_high && self.delta_high < 1.0) {
            return bad(format!(
                "delta thresholds must satisfy 0 < low < high < 1, got ({}, {})",
                self.delta_low, self.delta_high
            ));
        }
        if !(self.fee_cap > 0.0 && self.fee_cap < 1.0) {
            return bad(format!("fee_cap must be in (0, 1), got {}", self.fee_cap));
        }
        if !(self.initial_value > 0.0 && self.initial_value.is_finite()) {
            return bad(format!("initial_value must be > 0, got {}", self.initial_value));
        }
        if !(self.initial_delta > 0.0 && self.initial_delta < 1.0) {
            return bad(format!("initial_delta must be in (0, 1), got {}", self.initial_delta));
        }

        match self.fee_policy {
            FeePolicy::Fixed { rate_bps } => {
                if !(rate_bps >= 0.0 && rate_bps.is_finite()) {
                    return bad(format!("fixed fee must be >= 0 bps, got {}", rate_bps));
                }
            }
            FeePolicy::Variable { theta, alpha, volume } => {
                if !(theta >= 0.0 && theta.is_finite()) {
                    return bad(format!("theta must be >= 0, got {}", theta));
                }
                if !alpha.is_finite() {
                    return bad(format!("alpha must be finite, got {}", alpha));
                }
                if !(volume >= 0.0 && volume.is_finite()) {
                    return bad(format!("volume must be >= 0, got {}", volume));
                }
            }
        }

        Ok(())
    }
}

// ============================================
// STATE
// ============================================

/// All mutable simulation state, threaded through `Simulation::step`
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub detector: TrendState,
    pub position: DualRangePosition,
    pub prev_sqrt: f64,
    pub init_sqrt: f64,
}

/// Everything observed at one step, before the output is flattened
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub index: usize,
    pub sqrt_price: f64,
    pub price: f64,
    pub ask_quote: f64,
    pub bid_quote: f64,
    pub ask_fee_pct: f64,
    pub bid_fee_pct: f64,
    pub pnl_ratio: f64,
    pub fee_clamped: bool,
    pub portfolio_value: f64,
    pub baseline_value: f64,
    /// Range compositions used for valuation (before any rebalance this step)
    pub primary_tokens: (f64, f64),
    pub secondary_tokens: (f64, f64),
    /// Primary sqrt bounds used for valuation
    pub primary_bounds: Option<(f64, f64)>,
    pub rebalance: Option<RebalanceReport>,
}

// ============================================
// OUTPUT
// ============================================

/// Six aligned series plus run counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub price: Vec<f64>,
    pub ask_quote: Vec<f64>,
    pub bid_quote: Vec<f64>,
    pub ask_fee_pct: Vec<f64>,
    pub bid_fee_pct: Vec<f64>,
    pub pnl_ratio: Vec<f64>,
    pub rebalances: usize,
    pub degenerate_mints: usize,
    pub clamped_quotes: usize,
}

impl SimulationOutput {
    fn with_capacity(n: usize) -> Self {
        Self {
            price: Vec::with_capacity(n),
            ask_quote: Vec::with_capacity(n),
            bid_quote: Vec::with_capacity(n),
            ask_fee_pct: Vec::with_capacity(n),
            bid_fee_pct: Vec::with_capacity(n),
            pnl_ratio: Vec::with_capacity(n),
            ..Default::default()
        }
    }

    fn push(&mut self, record: &StepRecord) {
        self.price.push(record.price);
        self.ask_quote.push(record.ask_quote);
        self.bid_quote.push(record.bid_quote);
        self.ask_fee_pct.push(record.ask_fee_pct);
        self.bid_fee_pct.push(record.bid_fee_pct);
        self.pnl_ratio.push(record.pnl_ratio);

        if let Some(report) = &record.rebalance {
            self.rebalances += 1;
            self.degenerate_mints += report.degenerate_mints();
        }
        if record.fee_clamped {
            self.clamped_quotes += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.price.len()
    }

    pub fn is_empty(&self) -> bool {
        self.price.is_empty()
    }

    pub fn final_pnl(&self) -> Option<f64> {
        self.pnl_ratio.last().copied()
    }
}

// ============================================
// ENGINE
// ============================================

/// Per-run engine; pure with respect to its parameters
#[derive(Debug, Clone)]
pub struct Simulation {
    params: SimulationParams,
    fee_model: FeeModel,
}

impl Simulation {
    pub fn new(params: SimulationParams) -> SimResult<Self> {
        params.validate()?;
        let fee_model = FeeModel::new(params.fee_policy, params.fee_cap);
        Ok(Self { params, fee_model })
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Check the input contract; nothing runs on failure
    pub fn validate_input(sqrt_prices: &[f64], liquidity: &[f64]) -> SimResult<()> {
        if sqrt_prices.len() != liquidity.len() {
            return Err(SimulationError::InvalidInput(format!(
                "length mismatch: {} sqrt prices vs {} liquidity values",
                sqrt_prices.len(),
                liquidity.len()
            )));
        }
        if sqrt_prices.len() < 2 {
            return Err(SimulationError::InvalidInput(format!(
                "need at least 2 observations, got {}",
                sqrt_prices.len()
            )));
        }
        if let Some(i) = sqrt_prices.iter().position(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(SimulationError::InvalidInput(format!(
                "sqrt price at index {} must be finite and > 0, got {}",
                i, sqrt_prices[i]
            )));
        }
        if let Some(i) = liquidity.iter().position(|l| !(l.is_finite() && *l >= 0.0)) {
            return Err(SimulationError::InvalidInput(format!(
                "liquidity at index {} must be finite and >= 0, got {}",
                i, liquidity[i]
            )));
        }
        Ok(())
    }

    /// Initial state from the first two observations, after checking the input contract
    pub fn seed(&self, sqrt_prices: &[f64], liquidity: &[f64]) -> SimResult<SimulationState> {
        Self::validate_input(sqrt_prices, liquidity)?;

        let init_sqrt = sqrt_prices[0];
        let value = self.params.initial_value;
        let delta = self.params.initial_delta;

        Ok(SimulationState {
            detector: TrendState::new(init_sqrt),
            position: DualRangePosition::new(
                self.params.range_layout(),
                value * delta,
                value * (1.0 - delta) * init_sqrt * init_sqrt,
            ),
            prev_sqrt: sqrt_prices[1],
            init_sqrt,
        })
    }

    /// Value of the untouched initial allocation, in token0 units
    pub fn baseline_value(&self, init_sqrt: f64, sqrt_price: f64) -> f64 {
        let value = self.params.initial_value;
        let delta = self.params.initial_delta;
        let ratio = init_sqrt / sqrt_price;
        value * delta + value * (1.0 - delta) * ratio * ratio
    }

    /// Advance one observation
    pub fn step(
        &self,
        mut state: SimulationState,
        index: usize,
        sqrt_price: f64,
        active_liquidity: f64,
    ) -> SimResult<(SimulationState, StepRecord)> {
        let overflow = |what| SimulationError::NumericOverflow { step: index, what };

        state.detector.update(sqrt_price, self.params.beta);
        let swing = state.detector.swing_distance(sqrt_price);

        let quote = self.fee_model.quote(sqrt_price, active_liquidity, swing);
        if !quote.ask.is_finite() || !quote.bid.is_finite() {
            return Err(overflow("fee rate"));
        }

        let pool_fee = quote.pool_fee(state.prev_sqrt, sqrt_price);
        state.position.accrue_fees(state.prev_sqrt, sqrt_price, pool_fee);

        let [primary_tokens, secondary_tokens] = state.position.range_tokens(sqrt_price);
        let primary_bounds = state
            .position
            .primary()
            .map(|r| (r.sqrt_lower, r.sqrt_upper));

        let portfolio_value = state.position.value_in_token0(sqrt_price);
        if !portfolio_value.is_finite() {
            return Err(overflow("portfolio value"));
        }
        let baseline_value = self.baseline_value(state.init_sqrt, sqrt_price);
        if !baseline_value.is_finite() || baseline_value <= 0.0 {
            return Err(overflow("baseline value"));
        }
        let pnl_ratio = portfolio_value / baseline_value - 1.0;
        if !pnl_ratio.is_finite() {
            return Err(overflow("pnl ratio"));
        }

        let rebalance = if index % self.params.rebalance_cadence == 0 {
            Some(state.position.rebalance(sqrt_price)?)
        } else {
            None
        };

        let price = sqrt_price * sqrt_price;
        let record = StepRecord {
            index,
            sqrt_price,
            price,
            ask_quote: quote.ask_price(price),
            bid_quote: quote.bid_price(price),
            ask_fee_pct: quote.ask * 100.0,
            bid_fee_pct: quote.bid * 100.0,
            pnl_ratio,
            fee_clamped: quote.clamped,
            portfolio_value,
            baseline_value,
            primary_tokens,
            secondary_tokens,
            primary_bounds,
            rebalance,
        };
        trace!(
            "step {}: price {:.6e} ask {:.4}% bid {:.4}% pnl {:.6}",
            index,
            price,
            record.ask_fee_pct,
            record.bid_fee_pct,
            pnl_ratio
        );

        state.prev_sqrt = sqrt_price;
        Ok((state, record))
    }

    /// Run the whole series
    pub fn run(&self, sqrt_prices: &[f64], liquidity: &[f64]) -> SimResult<SimulationOutput> {
        self.run_with(sqrt_prices, liquidity, |_, _| {})
    }

    /// Run the whole series, handing every step record and post-step state to `observer`
    pub fn run_with<F>(
        &self,
        sqrt_prices: &[f64],
        liquidity: &[f64],
        mut observer: F,
    ) -> SimResult<SimulationOutput>
    where
        F: FnMut(&StepRecord, &SimulationState),
    {
        let mut state = self.seed(sqrt_prices, liquidity)?;
        let mut output = SimulationOutput::with_capacity(sqrt_prices.len() - 2);

        for index in 2..sqrt_prices.len() {
            let (next, record) = self.step(state, index, sqrt_prices[index], liquidity[index])?;
            observer(&record, &next);
            output.push(&record);
            state = next;
        }

        debug!(
            "Run complete [{}]: {} steps, {} rebalances, {} degenerate mints, {} clamped quotes",
            self.params.fee_policy,
            output.len(),
            output.rebalances,
            output.degenerate_mints,
            output.clamped_quotes
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::position::{Placement, SecondaryOutcome};

    fn fixed_params() -> SimulationParams {
        SimulationParams::default()
    }

    fn variable_params() -> SimulationParams {
        SimulationParams::default().with_policy(FeePolicy::Variable {
            theta: 0.0003,
            alpha: 1.0,
            volume: 1e11,
        })
    }

    /// Deterministic zig-zag around 1.0 with a slow drift
    fn wavy_series(n: usize) -> (Vec<f64>, Vec<f64>) {
        let sqrt: Vec<f64> = (0..n)
            .map(|i| {
                let t = i as f64;
                1.0 + 0.01 * (t / 7.0).sin() + 0.0002 * t
            })
            .collect();
        let liq = (0..n).map(|i| 1e15 + 1e13 * (i % 5) as f64).collect();
        (sqrt, liq)
    }

    #[test]
    fn test_output_length_is_input_minus_two() {
        let sim = Simulation::new(fixed_params()).unwrap();
        for n in [2usize, 3, 11, 57] {
            let (sqrt, liq) = wavy_series(n);
            let out = sim.run(&sqrt, &liq).unwrap();
            assert_eq!(out.len(), n - 2);
            assert_eq!(out.ask_quote.len(), n - 2);
            assert_eq!(out.pnl_ratio.len(), n - 2);
        }
    }

    #[test]
    fn test_rejects_invalid_input() {
        let sim = Simulation::new(fixed_params()).unwrap();

        let err = sim.run(&[1.0, 1.0, 1.0], &[1.0, 1.0]).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidInput(_)));

        let err = sim.run(&[1.0], &[1.0]).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidInput(_)));

        let err = sim.run(&[1.0, 0.0, 1.0], &[1.0, 1.0, 1.0]).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidInput(_)));

        let err = sim.run(&[1.0, 1.0, 1.0], &[1.0, -1.0, 1.0]).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_invalid_params() {
        let mut params = fixed_params();
        params.delta_low = 0.7;
        params.delta_high = 0.6;
        assert!(matches!(
            Simulation::new(params).unwrap_err(),
            SimulationError::InvalidConfig(_)
        ));

        let mut params = fixed_params();
        params.rebalance_cadence = 0;
        assert!(Simulation::new(params).is_err());

        let mut params = fixed_params();
        params.beta = 1.5;
        assert!(Simulation::new(params).is_err());
    }

    #[test]
    fn test_rejects_unbounded_range_widths() {
        let mut params = fixed_params();
        params.primary_half_width_ticks = i32::MAX;
        assert!(matches!(
            Simulation::new(params).unwrap_err(),
            SimulationError::InvalidConfig(_)
        ));

        // Spacing 10: at most 88_727 ticks per side
        let mut params = fixed_params();
        params.secondary_width_ticks = 88_728;
        assert!(Simulation::new(params.clone()).is_err());
        params.secondary_width_ticks = 88_727;
        assert!(Simulation::new(params).is_ok());
    }

    #[test]
    fn test_seed_checks_input() {
        let sim = Simulation::new(fixed_params()).unwrap();

        assert!(matches!(
            sim.seed(&[1.0], &[1.0]).unwrap_err(),
            SimulationError::InvalidInput(_)
        ));
        assert!(matches!(
            sim.seed(&[], &[]).unwrap_err(),
            SimulationError::InvalidInput(_)
        ));

        let state = sim.seed(&[1.0, 1.1], &[1.0, 1.0]).unwrap();
        assert_eq!(state.init_sqrt, 1.0);
        assert_eq!(state.prev_sqrt, 1.1);
        assert_eq!(state.position.free_balances(), (1e18, 1e18));
        assert!(state.position.primary().is_none());
    }

    #[test]
    fn test_constant_price_fixed_fee() {
        let sim = Simulation::new(fixed_params()).unwrap();
        let sqrt = vec![1.0; 11];
        let liq = vec![5e6; 11];

        let out = sim.run(&sqrt, &liq).unwrap();

        assert_eq!(out.len(), 9);
        assert_eq!(out.rebalances, 1);
        for i in 0..out.len() {
            assert_eq!(out.price[i], 1.0);
            assert!((out.ask_quote[i] - 1.0005).abs() < 1e-12);
            assert!((out.bid_quote[i] - 1.0 / 1.0005).abs() < 1e-12);
            assert!((out.bid_quote[i] - 0.9995).abs() < 1e-6);
            assert!((out.ask_fee_pct[i] - 0.05).abs() < 1e-12);
            assert!(out.pnl_ratio[i].abs() < 1e-12, "pnl drifted: {}", out.pnl_ratio[i]);
        }
    }

    #[test]
    fn test_constant_price_accrues_no_fees() {
        let sim = Simulation::new(fixed_params()).unwrap();
        let sqrt = vec![1.0; 25];
        let liq = vec![5e6; 25];

        sim.run_with(&sqrt, &liq, |_, state| {
            assert_eq!(state.position.pending_fees(), (0.0, 0.0));
        })
        .unwrap();
    }

    #[test]
    fn test_fixed_policy_is_idempotent() {
        let sim = Simulation::new(fixed_params()).unwrap();
        let (sqrt, liq) = wavy_series(200);

        let first = sim.run(&sqrt, &liq).unwrap();
        let second = sim.run(&sqrt, &liq).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_range_bounds_always_ordered() {
        let sim = Simulation::new(variable_params()).unwrap();
        let (sqrt, liq) = wavy_series(300);

        sim.run_with(&sqrt, &liq, |_, state| {
            for range in [state.position.primary(), state.position.secondary()]
                .into_iter()
                .flatten()
            {
                assert!(range.sqrt_lower <= range.sqrt_upper);
                assert!(range.liquidity >= 0.0);
            }
        })
        .unwrap();
    }

    #[test]
    fn test_zero_liquidity_variable_fee_is_finite() {
        let sim = Simulation::new(variable_params()).unwrap();
        let (sqrt, mut liq) = wavy_series(40);
        liq[5] = 0.0;
        liq[20] = 0.0;

        let out = sim.run(&sqrt, &liq).unwrap();
        assert!(out.ask_fee_pct.iter().all(|f| f.is_finite()));
        assert!(out.bid_fee_pct.iter().all(|f| f.is_finite()));
    }

    #[test]
    fn test_secondary_range_placed_and_earns_fees() {
        let sim = Simulation::new(fixed_params()).unwrap();
        let (sqrt, liq) = wavy_series(400);

        let (mut below, mut above, mut earning_steps) = (0, 0, 0);
        sim.run_with(&sqrt, &liq, |record, state| {
            if let Some(RebalanceReport {
                secondary: SecondaryOutcome::Placed { placement, outcome },
                ..
            }) = record.rebalance
            {
                if !outcome.is_degenerate() {
                    match placement {
                        Placement::Below => below += 1,
                        Placement::Above => above += 1,
                    }
                }
            }
            if let Some(secondary) = state.position.secondary() {
                if secondary.fees_owed0 > 0.0 || secondary.fees_owed1 > 0.0 {
                    earning_steps += 1;
                }
            }
        })
        .unwrap();

        assert!(below > 0, "no secondary minted below price");
        assert!(above > 0, "no secondary minted above price");
        assert!(earning_steps > 0, "secondary never accrued fees");
    }

    #[test]
    fn test_rising_price_shifts_primary_into_token1() {
        let mut params = fixed_params();
        params.primary_half_width_ticks = 2;
        let sim = Simulation::new(params).unwrap();

        let sqrt: Vec<f64> = (0..40).map(|i| 1.01f64.powi(i)).collect();
        let liq = vec![1e15; 40];

        let mut above_range_steps = 0;
        sim.run_with(&sqrt, &liq, |record, _| {
            if let Some((_, upper)) = record.primary_bounds {
                if record.sqrt_price >= upper {
                    above_range_steps += 1;
                    assert_eq!(record.primary_tokens.0, 0.0);
                    assert!(record.primary_tokens.1 > 0.0);
                }
            }
        })
        .unwrap();

        assert!(above_range_steps > 0);
    }

    #[test]
    fn test_cadence_one_flat_price_is_fixed_point() {
        let mut params = fixed_params();
        params.rebalance_cadence = 1;
        let sim = Simulation::new(params).unwrap();

        let sqrt = vec![1.0; 15];
        let liq = vec![1e9; 15];

        let mut snapshots = Vec::new();
        sim.run_with(&sqrt, &liq, |record, state| {
            assert!(record.rebalance.is_some());
            let primary = state.position.primary().unwrap().clone();
            snapshots.push(primary);
        })
        .unwrap();

        let first = &snapshots[0];
        for range in &snapshots[1..] {
            assert_eq!(range.tick_lower, first.tick_lower);
            assert_eq!(range.tick_upper, first.tick_upper);
            assert_eq!(range.sqrt_lower, first.sqrt_lower);
            assert_eq!(range.sqrt_upper, first.sqrt_upper);
            assert!((range.liquidity - first.liquidity).abs() <= 1e-9 * first.liquidity);
        }
    }

    #[test]
    fn test_pnl_zero_before_first_rebalance() {
        let sim = Simulation::new(fixed_params()).unwrap();
        let (sqrt, liq) = wavy_series(10);

        let out = sim.run(&sqrt, &liq).unwrap();
        // Indices 2..=9: nothing is invested yet, so the position is the baseline
        for pnl in &out.pnl_ratio {
            assert!(pnl.abs() < 1e-12);
        }
    }

    #[test]
    fn test_extreme_ratio_is_numeric_overflow() {
        let sim = Simulation::new(fixed_params()).unwrap();
        let err = sim.run(&[1.0, 1.0, 1e-200], &[1.0, 1.0, 1.0]).unwrap_err();
        assert!(matches!(err, SimulationError::NumericOverflow { step: 2, .. }));
    }

    #[test]
    fn test_variable_fee_widens_spread_on_swings() {
        let fixed = Simulation::new(fixed_params()).unwrap();
        let variable = Simulation::new(variable_params()).unwrap();
        let (sqrt, liq) = wavy_series(120);

        let f = fixed.run(&sqrt, &liq).unwrap();
        let v = variable.run(&sqrt, &liq).unwrap();

        // theta alone is below the fixed fee, but the swing + flow terms push it over
        let widest = |o: &SimulationOutput| {
            o.ask_quote
                .iter()
                .zip(&o.bid_quote)
                .map(|(a, b)| a - b)
                .fold(0.0f64, f64::max)
        };
        assert!(widest(&v) > widest(&f));
    }
}
