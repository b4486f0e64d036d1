//! Backtest Configuration
//!
//! Dataset location, date window, fee policies and range layout. Loaded from
//! environment variables (and `.env`), or from a TOML file.

use chrono::{DateTime, Utc};
use eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use crate::engine::{FeePolicy, SimulationParams};
use crate::market::dataset::parse_date_start;
use crate::report::RunSummary;

// ============================================
// MAIN CONFIGURATION
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // ========== Dataset ==========
    /// Directory holding `{pool}_data.jsonl` files
    pub dataset_dir: String,

    /// Pool to backtest
    pub pool_address: String,

    /// Chain ID (42161 = Arbitrum One)
    pub chain_id: u64,

    /// Inclusive window, DD-MM-YYYY
    pub date_start: String,
    pub date_end: String,

    // ========== Output ==========
    /// Where series / comparison JSON files go
    pub output_dir: String,

    /// Append one JSON line per completed backtest
    pub run_log: bool,
    pub run_log_path: String,

    // ========== Fee Policies ==========
    /// Reference policy fee in basis points
    pub fixed_fee_bps: f64,

    /// Variable policy: fee = theta + alpha * (volume / 2L + swing) / sqrtP
    pub alpha: f64,
    pub theta: f64,
    pub volume: f64,

    /// Extra alphas to run alongside the main variable policy
    pub alpha_sweep: Vec<f64>,

    /// Upper clamp on any quoted fee rate
    pub fee_cap: f64,

    // ========== Swing Detector ==========
    /// Relative move that starts a new swing
    pub beta: f64,

    // ========== Range Layout ==========
    pub tick_spacing: u32,
    pub rebalance_cadence: usize,
    pub primary_half_width: i32,
    pub secondary_width: i32,
    pub delta_low: f64,
    pub delta_high: f64,

    // ========== Capital ==========
    pub initial_value: f64,
    pub initial_delta: f64,
}

/// `KEY` parsed as `T`, or `default` when unset or unparsable
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Comma-separated list; unparsable entries are dropped
fn parse_list(raw: &str) -> Vec<f64> {
    raw.split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect()
}

impl Config {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            // Dataset
            dataset_dir: env::var("DATASET_DIR").unwrap_or(defaults.dataset_dir),
            pool_address: env::var("POOL_ADDRESS").unwrap_or(defaults.pool_address),
            chain_id: env_or("CHAIN_ID", defaults.chain_id),
            date_start: env::var("DATE_START").unwrap_or(defaults.date_start),
            date_end: env::var("DATE_END").unwrap_or(defaults.date_end),

            // Output
            output_dir: env::var("OUTPUT_DIR").unwrap_or(defaults.output_dir),
            run_log: env_or("RUN_LOG", defaults.run_log),
            run_log_path: env::var("RUN_LOG_PATH").unwrap_or(defaults.run_log_path),

            // Fee policies
            fixed_fee_bps: env_or("FIXED_FEE_BPS", defaults.fixed_fee_bps),
            alpha: env_or("ALPHA", defaults.alpha),
            theta: env_or("THETA", defaults.theta),
            volume: env_or("VOLUME", defaults.volume),
            alpha_sweep: env::var("ALPHA_SWEEP")
                .map(|s| parse_list(&s))
                .unwrap_or_default(),
            fee_cap: env_or("FEE_CAP", defaults.fee_cap),

            // Detector
            beta: env_or("BETA", defaults.beta),

            // Ranges
            tick_spacing: env_or("TICK_SPACING", defaults.tick_spacing),
            rebalance_cadence: env_or("REBALANCE_CADENCE", defaults.rebalance_cadence),
            primary_half_width: env_or("PRIMARY_HALF_WIDTH", defaults.primary_half_width),
            secondary_width: env_or("SECONDARY_WIDTH", defaults.secondary_width),
            delta_low: env_or("DELTA_LOW", defaults.delta_low),
            delta_high: env_or("DELTA_HIGH", defaults.delta_high),

            // Capital
            initial_value: env_or("INITIAL_VALUE", defaults.initial_value),
            initial_delta: env_or("INITIAL_DELTA", defaults.initial_delta),
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .wrap_err_with(|| format!("Failed to read {}", path.as_ref().display()))?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Reference policy
    pub fn fixed_policy(&self) -> FeePolicy {
        FeePolicy::Fixed {
            rate_bps: self.fixed_fee_bps,
        }
    }

    pub fn variable_policy(&self, alpha: f64) -> FeePolicy {
        FeePolicy::Variable {
            theta: self.theta,
            alpha,
            volume: self.volume,
        }
    }

    /// Fixed first, then the main variable policy, then the sweep (duplicates of `alpha` skipped)
    pub fn policies(&self) -> Vec<FeePolicy> {
        let mut policies = vec![self.fixed_policy(), self.variable_policy(self.alpha)];
        for &alpha in &self.alpha_sweep {
            if alpha != self.alpha {
                policies.push(self.variable_policy(alpha));
            }
        }
        policies
    }

    /// Engine parameters under `fee_policy`
    pub fn simulation_params(&self, fee_policy: FeePolicy) -> SimulationParams {
        SimulationParams {
            beta: self.beta,
            tick_spacing: self.tick_spacing,
            fee_policy,
            fee_cap: self.fee_cap,
            rebalance_cadence: self.rebalance_cadence,
            primary_half_width_ticks: self.primary_half_width,
            secondary_width_ticks: self.secondary_width,
            delta_low: self.delta_low,
            delta_high: self.delta_high,
            initial_value: self.initial_value,
            initial_delta: self.initial_delta,
        }
    }

    /// One parameter set per policy, in `policies()` order
    pub fn batch(&self) -> Vec<SimulationParams> {
        self.policies()
            .into_iter()
            .map(|p| self.simulation_params(p))
            .collect()
    }

    /// Validate everything before touching the dataset
    pub fn validate(&self) -> Result<()> {
        if self.pool_address.trim().is_empty() {
            return Err(eyre!("POOL_ADDRESS is empty"));
        }

        let start = parse_date_start(&self.date_start).wrap_err("Invalid DATE_START")?;
        let end = parse_date_start(&self.date_end).wrap_err("Invalid DATE_END")?;
        if start > end {
            return Err(eyre!(
                "DATE_START {} is after DATE_END {}",
                self.date_start,
                self.date_end
            ));
        }

        for policy in self.policies() {
            self.simulation_params(policy)
                .validate()
                .map_err(|e| eyre!("{} ({})", e, policy))?;
        }

        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("╔════════════════════════════════════════════════════════════╗");
        println!("║            ANTI-TOXICITY BACKTEST - CONFIGURATION          ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ Pool:     {:<48} ║", self.pool_address);
        println!("║ Chain ID: {:<48} ║", self.chain_id);
        println!("║ Window:   {:<48} ║", format!("{} → {}", self.date_start, self.date_end));
        println!("║ Dataset:  {:<48} ║", self.dataset_dir);
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ FEE POLICIES                                               ║");
        println!("║ • Fixed:           {:<39} ║", format!("{} bps", self.fixed_fee_bps));
        println!("║ • Variable α:      {:<39} ║", self.alpha);
        println!("║ • θ (floor):       {:<39} ║", self.theta);
        println!("║ • Volume:          {:<39.2e} ║", self.volume);
        println!("║ • Fee cap:         {:<39} ║", self.fee_cap);
        println!("║ • α sweep:         {:<39} ║",
            if self.alpha_sweep.is_empty() {
                "-".to_string()
            } else {
                format!("{:?}", self.alpha_sweep)
            }
        );
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ RANGES                                                     ║");
        println!("║ • β (swing):       {:<39} ║", self.beta);
        println!("║ • Tick spacing:    {:<39} ║", self.tick_spacing);
        println!("║ • Rebalance every: {:<39} ║", format!("{} blocks", self.rebalance_cadence));
        println!("║ • Primary:         {:<39} ║", format!("±{} ticks", self.primary_half_width));
        println!("║ • Secondary:       {:<39} ║", format!("{} ticks", self.secondary_width));
        println!("║ • Delta band:      {:<39} ║", format!("[{}, {}]", self.delta_low, self.delta_high));
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ • Run Log:         {:<39} ║",
            if self.run_log { "✓ Enabled" } else { "✗ Disabled" }
        );
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

impl Default for Config {
    fn default() -> Self {
        let params = SimulationParams::default();
        Self {
            dataset_dir: "./dataset".to_string(),
            pool_address: "0xc6962004f452be9203591991d15f6b388e09e8d0".to_string(),
            chain_id: 42161,
            date_start: "18-11-2025".to_string(),
            date_end: "31-12-2025".to_string(),
            output_dir: "./output".to_string(),
            run_log: true,
            run_log_path: "./logs/backtest_runs.log".to_string(),
            fixed_fee_bps: 5.0,
            alpha: 1.0,
            theta: 0.0003,
            volume: 1e11,
            alpha_sweep: vec![],
            fee_cap: params.fee_cap,
            beta: params.beta,
            tick_spacing: params.tick_spacing,
            rebalance_cadence: params.rebalance_cadence,
            primary_half_width: params.primary_half_width_ticks,
            secondary_width: params.secondary_width_ticks,
            delta_low: params.delta_low,
            delta_high: params.delta_high,
            initial_value: params.initial_value,
            initial_delta: params.initial_delta,
        }
    }
}

// ============================================
// RUN LOGGER
// ============================================

/// One completed backtest, appended as a JSON line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLog {
    pub timestamp: DateTime<Utc>,
    pub pool_address: String,
    pub chain_id: u64,
    pub date_start: String,
    pub date_end: String,
    pub blocks: Option<(u64, u64)>,
    pub results: Vec<RunSummary>,
}

impl RunLog {
    pub fn new(config: &Config, blocks: Option<(u64, u64)>, results: Vec<RunSummary>) -> Self {
        Self {
            timestamp: Utc::now(),
            pool_address: config.pool_address.clone(),
            chain_id: config.chain_id,
            date_start: config.date_start.clone(),
            date_end: config.date_end.clone(),
            blocks,
            results,
        }
    }

    /// Append this log to a file
    pub fn append_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        // Create parent directories if needed
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        let json = serde_json::to_string(self)?;
        writeln!(file, "{}", json)?;

        Ok(())
    }
}

// ============================================
// TESTS
// ============================================
