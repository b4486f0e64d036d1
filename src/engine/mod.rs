//! The Engine
//!
//! Responsible for:
//! - Tick / sqrt-price conversions and range token amounts
//! - Trend/reversal swing tracking and ask/bid fee quoting
//! - The dual-range position (fee accrual, burn, re-mint)
//! - Folding a price/liquidity series into P&L and quote series

pub mod batch;
pub mod detector;
pub mod error;
pub mod fee_model;
pub mod position;
pub mod range_math;
pub mod simulation;

pub use batch::{run_policies, BatchError, PolicyRun, SeriesInput};
pub use detector::{SwingDistance, TrendState};
pub use error::{SimResult, SimulationError};
pub use fee_model::{FeeModel, FeePolicy, FeeQuote};
pub use position::{
    DegenerateReason, DualRangePosition, MintOutcome, Placement, Range, RangeLayout,
    RebalanceReport, SecondaryOutcome,
};
pub use simulation::{
    Simulation, SimulationOutput, SimulationParams, SimulationState, StepRecord,
};
