//! Batch Runner
//!
//! Runs several policy configurations over the same immutable input.
//! Each run owns its own state; the input is shared read-only behind an
//! `Arc` and every run executes on tokio's blocking pool.

use std::sync::Arc;

use futures::future::try_join_all;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::info;

use super::error::SimulationError;
use super::simulation::{Simulation, SimulationOutput, SimulationParams};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("simulation task failed: {0}")]
    Join(#[from] JoinError),
}

/// Aligned input sequences shared by every run in a batch
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesInput {
    pub sqrt_prices: Vec<f64>,
    pub liquidity: Vec<f64>,
}

impl SeriesInput {
    pub fn new(sqrt_prices: Vec<f64>, liquidity: Vec<f64>) -> Self {
        Self { sqrt_prices, liquidity }
    }

    pub fn len(&self) -> usize {
        self.sqrt_prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sqrt_prices.is_empty()
    }
}

/// One finished run
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyRun {
    pub params: SimulationParams,
    pub output: SimulationOutput,
}

impl PolicyRun {
    pub fn label(&self) -> String {
        self.params.fee_policy.label()
    }
}

/// Run every configuration concurrently; results keep the order of `configs`.
/// The first failing run fails the batch.
pub async fn run_policies(
    input: Arc<SeriesInput>,
    configs: Vec<SimulationParams>,
) -> Result<Vec<PolicyRun>, BatchError> {
    info!("Running {} policies over {} points", configs.len(), input.len());

    let tasks = configs.into_iter().map(|params| {
        let input = Arc::clone(&input);
        async move {
            let handle = tokio::task::spawn_blocking(move || -> Result<PolicyRun, SimulationError> {
                let sim = Simulation::new(params)?;
                let output = sim.run(&input.sqrt_prices, &input.liquidity)?;
                Ok(PolicyRun {
                    params: sim.params().clone(),
                    output,
                })
            });
            Ok::<_, BatchError>(handle.await??)
        }
    });

    try_join_all(tasks).await
}
