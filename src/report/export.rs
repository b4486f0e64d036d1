//! JSON export for external plotting
//!
//! - `{output_dir}/{label}_series.json`: the six aligned series of one run
//! - `{output_dir}/comparison.json`: market summary and every run summary

use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

use super::stats::Comparison;
use crate::engine::{FeePolicy, PolicyRun};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesExport {
    pub label: String,
    pub policy: FeePolicy,
    pub price: Vec<f64>,
    pub ask_quote: Vec<f64>,
    pub bid_quote: Vec<f64>,
    pub ask_fee_pct: Vec<f64>,
    pub bid_fee_pct: Vec<f64>,
    pub pnl_ratio: Vec<f64>,
}

impl From<&PolicyRun> for SeriesExport {
    fn from(run: &PolicyRun) -> Self {
        let out = &run.output;
        Self {
            label: run.label(),
            policy: run.params.fee_policy,
            price: out.price.clone(),
            ask_quote: out.ask_quote.clone(),
            bid_quote: out.bid_quote.clone(),
            ask_fee_pct: out.ask_fee_pct.clone(),
            bid_fee_pct: out.bid_fee_pct.clone(),
            pnl_ratio: out.pnl_ratio.clone(),
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = fs::File::create(path)
        .wrap_err_with(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer(BufWriter::new(file), value)
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Write one run's series; returns the file path
pub fn write_series<P: AsRef<Path>>(output_dir: P, run: &PolicyRun) -> Result<PathBuf> {
    fs::create_dir_all(output_dir.as_ref())?;
    let export = SeriesExport::from(run);
    let path = output_dir
        .as_ref()
        .join(format!("{}_series.json", export.label));
    write_json(&path, &export)?;
    info!("Saved: {}", path.display());
    Ok(path)
}

/// Write the comparison summary; returns the file path
pub fn write_comparison<P: AsRef<Path>>(output_dir: P, comparison: &Comparison) -> Result<PathBuf> {
    fs::create_dir_all(output_dir.as_ref())?;
    let path = output_dir.as_ref().join("comparison.json");
    write_json(&path, comparison)?;
    info!("Saved: {}", path.display());
    Ok(path)
}
