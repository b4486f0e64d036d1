//! Diagnostic tool - Check backtest setup
//!
//! Run with: cargo run --bin diagnose

use std::env;

use toxicity_backtest::config::Config;
use toxicity_backtest::market::{dataset_path, PoolSeries};

fn main() {
    println!("🔍 BACKTEST DIAGNOSTIC CHECK\n");

    // Load .env
    dotenvy::dotenv().ok();

    println!("═══════════════════════════════════════════════════");
    println!("                  CONFIGURATION                     ");
    println!("═══════════════════════════════════════════════════\n");

    let defaults = Config::default();
    let checks = [
        ("DATASET_DIR", defaults.dataset_dir.clone(), "Where pool history lives"),
        ("POOL_ADDRESS", defaults.pool_address.clone(), "Pool to backtest"),
        ("DATE_START", defaults.date_start.clone(), "First day (DD-MM-YYYY)"),
        ("DATE_END", defaults.date_end.clone(), "Last day (DD-MM-YYYY)"),
        ("FIXED_FEE_BPS", defaults.fixed_fee_bps.to_string(), "Reference fee"),
        ("ALPHA", defaults.alpha.to_string(), "Variable fee sensitivity"),
        ("BETA", defaults.beta.to_string(), "Swing threshold"),
        ("THETA", defaults.theta.to_string(), "Variable fee floor"),
        ("VOLUME", defaults.volume.to_string(), "Flow-size estimate"),
        ("REBALANCE_CADENCE", defaults.rebalance_cadence.to_string(), "Blocks between rebalances"),
    ];

    for (key, default, desc) in checks {
        let value = env::var(key).unwrap_or(default);
        let is_default = env::var(key).is_err();
        let marker = if is_default { "(default)" } else { "(from .env)" };
        println!("  {}: {} {}", key, value, marker);
        println!("    └─ {}\n", desc);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("  ❌ Failed to read configuration: {}", e);
            return;
        }
    };

    println!("═══════════════════════════════════════════════════");
    println!("                    VALIDATION                      ");
    println!("═══════════════════════════════════════════════════\n");

    match config.validate() {
        Ok(()) => println!("  ✅ Parameters valid ({} policies)", config.policies().len()),
        Err(e) => println!("  ❌ {}", e),
    }

    println!("\n═══════════════════════════════════════════════════");
    println!("                     DATASET                        ");
    println!("═══════════════════════════════════════════════════\n");

    let path = dataset_path(&config.dataset_dir, &config.pool_address);
    if !path.exists() {
        println!("  ❌ {} not found", path.display());
        println!("     → Generate a synthetic one with: cargo run --bin generate-series");
        println!("\n⚠️  Diagnostic complete with problems.\n");
        return;
    }
    println!("  ✅ {}", path.display());

    match PoolSeries::load(&config.dataset_dir, &config.pool_address) {
        Ok(series) => {
            println!("  Records: {}", series.len());
            if let Some((first, last)) = series.block_range() {
                println!("  Blocks:  {} → {}", first, last);
            }
            match series.filter_dates(&config.date_start, &config.date_end) {
                Ok(window) => {
                    println!(
                        "  ✅ {} records between {} and {}",
                        window.len(),
                        config.date_start,
                        config.date_end
                    );
                    if let Err(e) = window.validate() {
                        println!("  ❌ {}", e);
                    }
                }
                Err(e) => println!("  ❌ {}", e),
            }
        }
        Err(e) => println!("  ❌ {:#}", e),
    }

    println!("\n✅ Diagnostic complete!\n");
}
