//! Anti-Toxicity Backtest
//!
//! Run with: cargo run -- --start 18-11-2025 --end 31-12-2025
//!
//! Replays a pool's per-block sqrt price / active liquidity through a
//! dual-range LP position under a fixed fee and a toxicity-aware variable
//! fee, then compares the P&L of both against buy-and-hold.

use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use toxicity_backtest::config::{Config, RunLog};
use toxicity_backtest::engine::{run_policies, SeriesInput};
use toxicity_backtest::market::PoolSeries;
use toxicity_backtest::report::{self, console as report_console, Comparison};

#[derive(Parser, Debug)]
#[command(name = "toxicity-backtest")]
#[command(about = "Fixed vs toxicity-aware variable fee backtest for a concentrated-liquidity LP")]
struct Args {
    /// TOML configuration file (environment variables are used when omitted)
    #[arg(short, long)]
    config: Option<String>,

    /// Pool address
    #[arg(long)]
    pool: Option<String>,

    /// First day, DD-MM-YYYY
    #[arg(long)]
    start: Option<String>,

    /// Last day, DD-MM-YYYY
    #[arg(long)]
    end: Option<String>,

    /// Directory holding `{pool}_data.jsonl`
    #[arg(long)]
    dataset_dir: Option<String>,

    /// Directory for JSON exports
    #[arg(long)]
    output_dir: Option<String>,

    /// Extra variable-fee alphas, comma separated
    #[arg(long, value_delimiter = ',')]
    sweep_alpha: Vec<f64>,

    /// Skip writing JSON exports
    #[arg(long)]
    no_export: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn print_banner() {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!(
        "{}",
        style(" 🧪 ANTI-TOXICITY BACKTEST - Dual-Range LP Simulator").cyan().bold()
    );
    println!(
        "{}",
        style("    Fixed Fee | Variable Fee | Buy-and-Hold Baseline").cyan()
    );
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!();
}

fn spinner(message: &str) -> Result<ProgressBar> {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")?);
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    Ok(bar)
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .wrap_err_with(|| format!("Failed to load config file {}", path))?,
        None => Config::from_env()?,
    };

    if let Some(pool) = &args.pool {
        config.pool_address = pool.clone();
    }
    if let Some(start) = &args.start {
        config.date_start = start.clone();
    }
    if let Some(end) = &args.end {
        config.date_end = end.clone();
    }
    if let Some(dir) = &args.dataset_dir {
        config.dataset_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if !args.sweep_alpha.is_empty() {
        config.alpha_sweep = args.sweep_alpha.clone();
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    color_eyre::install()?;

    let directive = if args.verbose {
        "toxicity_backtest=debug"
    } else {
        "toxicity_backtest=info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    print_banner();

    // Load configuration
    let config = load_config(&args)?;

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        error!("Please check your .env file or --config TOML");
        return Err(e);
    }

    // Print configuration summary
    config.print_summary();
    println!();

    // =============================================
    // PHASE 1: DATASET
    // =============================================
    println!("{}", style("═══ PHASE 1: DATASET ═══").blue().bold());
    println!();

    let bar = spinner("Fetching pool data...")?;
    let loaded = PoolSeries::load(&config.dataset_dir, &config.pool_address)
        .and_then(|s| s.filter_dates(&config.date_start, &config.date_end))
        .and_then(|s| s.validate().map(|_| s));
    bar.finish_and_clear();
    let series = loaded?;

    println!(
        "{} Loaded {} records",
        style("✓").green(),
        style(series.len()).bold()
    );
    if let Some((first, last)) = series.block_range() {
        println!("   Block range: {} to {}", first, last);
    }
    println!();

    // =============================================
    // PHASE 2: SIMULATION
    // =============================================
    println!("{}", style("═══ PHASE 2: SIMULATION ═══").magenta().bold());
    println!();

    let input = Arc::new(SeriesInput::new(series.sqrt_prices(), series.liquidities()));
    let batch = config.batch();
    for params in &batch {
        println!("   • {}", params.fee_policy);
    }

    let started = Instant::now();
    let bar = spinner(&format!("Simulating {} policies...", batch.len()))?;
    let result = run_policies(input, batch).await;
    bar.finish_and_clear();
    let runs = result?;

    println!(
        "{} {} runs finished in {:.2?}",
        style("✓").green(),
        runs.len(),
        started.elapsed()
    );
    println!();

    // =============================================
    // PHASE 3: REPORT
    // =============================================
    println!("{}", style("═══ PHASE 3: REPORT ═══").green().bold());

    let comparison =
        Comparison::from_runs(&runs).ok_or_else(|| eyre!("Simulation produced no output"))?;
    report_console::print_header(
        &runs[0].params,
        &config.variable_policy(config.alpha),
        &comparison.market,
    );
    report_console::print_comparison(&comparison);

    if !args.no_export {
        for run in &runs {
            report::write_series(&config.output_dir, run)?;
        }
        let path = report::write_comparison(&config.output_dir, &comparison)?;
        println!("{} Exports written to {}", style("✓").green(), path.display());
    }

    if config.run_log {
        let mut results = vec![comparison.reference.clone()];
        results.extend(comparison.candidates.iter().cloned());
        let log = RunLog::new(&config, series.block_range(), results);
        match log.append_to_file(&config.run_log_path) {
            Ok(()) => info!("Run logged to {}", config.run_log_path),
            Err(e) => warn!("Failed to write run log: {}", e),
        }
    }

    Ok(())
}
