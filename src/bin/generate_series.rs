//! Synthetic Dataset Generator
//!
//! Run with: cargo run --bin generate-series -- --blocks 100000 --seed 7
//!
//! Writes `{dataset_dir}/{pool}_data.jsonl` in the backtest's dataset format.

use clap::Parser;
use color_eyre::eyre::Result;

use toxicity_backtest::market::dataset::{dataset_path, parse_date_start};
use toxicity_backtest::market::synthetic::{random_walk, WalkParams};

#[derive(Parser, Debug)]
#[command(name = "generate-series")]
#[command(about = "Write a seeded random-walk pool history")]
struct Args {
    /// Pool address used for the file name
    #[arg(long, default_value = "0xc6962004f452be9203591991d15f6b388e09e8d0")]
    pool: String,

    /// Output directory
    #[arg(long, default_value = "./dataset")]
    dataset_dir: String,

    /// First day, DD-MM-YYYY
    #[arg(long, default_value = "18-11-2025")]
    start: String,

    /// Number of blocks
    #[arg(long, default_value = "50000")]
    blocks: usize,

    /// Seconds per block
    #[arg(long, default_value = "60")]
    block_time: i64,

    /// Starting sqrt price
    #[arg(long, default_value = "0.0167")]
    sqrt_price: f64,

    /// Max relative sqrt-price move per block
    #[arg(long, default_value = "0.0005")]
    volatility: f64,

    /// Mean active liquidity
    #[arg(long, default_value = "5e18")]
    liquidity: f64,

    /// Chance a block reports zero active liquidity
    #[arg(long, default_value = "0.0")]
    empty_prob: f64,

    #[arg(long, default_value = "42")]
    seed: u64,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    println!();
    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║          SYNTHETIC POOL HISTORY GENERATOR                  ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();

    let params = WalkParams {
        blocks: args.blocks,
        start_timestamp: parse_date_start(&args.start)?,
        block_time: args.block_time,
        initial_sqrt_price: args.sqrt_price,
        volatility: args.volatility,
        base_liquidity: args.liquidity,
        empty_liquidity_prob: args.empty_prob.clamp(0.0, 1.0),
        seed: args.seed,
        ..Default::default()
    };

    let series = random_walk(&args.pool, &params);
    series.validate()?;

    let path = dataset_path(&args.dataset_dir, &args.pool);
    series.write_jsonl(&path)?;

    let last = series.records.last().map(|r| r.sqrt_price).unwrap_or(args.sqrt_price);
    println!("📈 {} blocks written to {}", series.len(), path.display());
    println!("   Seed:        {}", args.seed);
    println!("   sqrt price:  {:.6} → {:.6}", args.sqrt_price, last);
    println!(
        "   Covers:      {} + {:.1} days",
        args.start,
        (args.blocks as f64 * args.block_time as f64) / 86_400.0
    );
    println!();

    Ok(())
}
