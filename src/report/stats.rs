//! Summary statistics over simulation output series

use serde::{Deserialize, Serialize};

use crate::engine::{FeePolicy, PolicyRun};

/// min / max / mean / last of one series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub last: f64,
}

impl SeriesStats {
    /// `None` for an empty series
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        let last = *values.last()?;
        let (min, max, sum) = values.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), &v| (min.min(v), max.max(v), sum + v),
        );
        Some(Self {
            min,
            max,
            mean: sum / values.len() as f64,
            last,
        })
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            min: self.min * factor,
            max: self.max * factor,
            mean: self.mean * factor,
            last: self.last * factor,
        }
    }
}

/// ask - bid per step
pub fn spread(ask: &[f64], bid: &[f64]) -> Vec<f64> {
    ask.iter().zip(bid).map(|(a, b)| a - b).collect()
}

/// Market-side view shared by every run over the same input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub points: usize,
    pub price: SeriesStats,
    pub spread: SeriesStats,
}

impl MarketSummary {
    /// Spread is taken from the given run
    pub fn from_run(run: &PolicyRun) -> Option<Self> {
        let out = &run.output;
        Some(Self {
            points: out.len(),
            price: SeriesStats::from_slice(&out.price)?,
            spread: SeriesStats::from_slice(&spread(&out.ask_quote, &out.bid_quote))?,
        })
    }
}

/// Per-policy result summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub label: String,
    pub policy: FeePolicy,
    pub points: usize,
    /// P&L in percent
    pub pnl_pct: SeriesStats,
    pub spread: SeriesStats,
    pub ask_fee_pct: SeriesStats,
    pub bid_fee_pct: SeriesStats,
    pub rebalances: usize,
    pub degenerate_mints: usize,
    pub clamped_quotes: usize,
}

impl RunSummary {
    pub fn from_run(run: &PolicyRun) -> Option<Self> {
        let out = &run.output;
        Some(Self {
            label: run.label(),
            policy: run.params.fee_policy,
            points: out.len(),
            pnl_pct: SeriesStats::from_slice(&out.pnl_ratio)?.scaled(100.0),
            spread: SeriesStats::from_slice(&spread(&out.ask_quote, &out.bid_quote))?,
            ask_fee_pct: SeriesStats::from_slice(&out.ask_fee_pct)?,
            bid_fee_pct: SeriesStats::from_slice(&out.bid_fee_pct)?,
            rebalances: out.rebalances,
            degenerate_mints: out.degenerate_mints,
            clamped_quotes: out.clamped_quotes,
        })
    }
}

/// Every policy against the reference (first) run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub market: MarketSummary,
    pub reference: RunSummary,
    pub candidates: Vec<RunSummary>,
}

impl Comparison {
    /// First run is the reference; `None` if there are no runs or any run is empty
    pub fn from_runs(runs: &[PolicyRun]) -> Option<Self> {
        let (first, rest) = runs.split_first()?;
        Some(Self {
            market: MarketSummary::from_run(first)?,
            reference: RunSummary::from_run(first)?,
            candidates: rest
                .iter()
                .map(RunSummary::from_run)
                .collect::<Option<Vec<_>>>()?,
        })
    }

    /// Candidate with the highest final P&L
    pub fn best_candidate(&self) -> Option<&RunSummary> {
        self.candidates
            .iter()
            .max_by(|a, b| a.pnl_pct.last.total_cmp(&b.pnl_pct.last))
    }

    /// Final P&L of the best candidate minus the reference, in percentage points
    pub fn edge_pct(&self) -> Option<f64> {
        self.best_candidate()
            .map(|best| best.pnl_pct.last - self.reference.pnl_pct.last)
    }
}
