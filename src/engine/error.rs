//! Simulation errors
//!
//! Everything here aborts a whole run. Degenerate mints during a rebalance
//! are NOT errors: they are recovered in place (see `position::MintOutcome`).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Input sequences violate the data contract (checked before step 0)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Parameters out of their allowed domain
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Range bounds in the wrong order
    #[error("invalid range: tick_lower {lower} > tick_upper {upper}")]
    InvalidRange { lower: i32, upper: i32 },

    /// Value blew up to inf/NaN at input index `step`
    #[error("numeric overflow at step {step}: {what} is not finite")]
    NumericOverflow { step: usize, what: &'static str },
}

pub type SimResult<T> = std::result::Result<T, SimulationError>;
