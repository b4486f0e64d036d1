//! Console report
//!
//! Header with the market summary, P&L statistics per policy and a final
//! verdict against the reference run.

use console::style;

use super::stats::{Comparison, MarketSummary, RunSummary};
use crate::engine::{FeePolicy, SimulationParams};

const RULE: &str = "══════════════════════════════════════════════════════════════════════";

/// "ANTI-TOXICITY BACKTEST" header
pub fn print_header(params: &SimulationParams, variable: &FeePolicy, market: &MarketSummary) {
    println!();
    println!("{}", style(RULE).cyan());
    println!("{}", style(" ANTI-TOXICITY BACKTEST").cyan().bold());
    println!("{}", style(RULE).cyan());

    if let FeePolicy::Variable { theta, alpha, volume } = variable {
        println!(
            " α={} | β={} | θ={} | vol={:.2e} | pts={}",
            alpha, params.beta, theta, volume, market.points
        );
    } else {
        println!(" β={} | pts={}", params.beta, market.points);
    }
    println!(
        " Price:  {:.2e} → {:.2e} (μ={:.2e})",
        market.price.min, market.price.max, market.price.mean
    );
    println!(
        " Spread: {:.6} → {:.6} (μ={:.6})",
        market.spread.min, market.spread.max, market.spread.mean
    );
    println!(
        " Rebalance every {} blocks | primary ±{} ticks | secondary {} ticks",
        params.rebalance_cadence, params.primary_half_width_ticks, params.secondary_width_ticks
    );
    println!("{}", style(RULE).cyan());
    println!();
}

/// Final / max / min / mean P&L of one run
pub fn print_run_stats(summary: &RunSummary) {
    let title = match summary.policy {
        FeePolicy::Fixed { .. } => style(format!("FIXED FEE P&L Statistics ({})", summary.policy))
            .blue()
            .bold(),
        FeePolicy::Variable { .. } => {
            style(format!("VARIABLE FEE P&L Statistics ({})", summary.policy))
                .magenta()
                .bold()
        }
    };

    println!("{}", title);
    println!("   Final P&L: {}", colored_pct(summary.pnl_pct.last));
    println!("   Max P&L:   {:.4}%", summary.pnl_pct.max);
    println!("   Min P&L:   {:.4}%", summary.pnl_pct.min);
    println!("   Mean P&L:  {:.4}%", summary.pnl_pct.mean);
    println!(
        "   Fees:      ask μ={:.4}% | bid μ={:.4}%",
        summary.ask_fee_pct.mean, summary.bid_fee_pct.mean
    );
    println!(
        "   Rebalances: {} | degenerate mints: {} | clamped quotes: {}",
        summary.rebalances, summary.degenerate_mints, summary.clamped_quotes
    );
    if summary.clamped_quotes > 0 {
        println!(
            "   {}",
            style(format!("{} quotes hit the fee cap", summary.clamped_quotes)).yellow()
        );
    }
    println!();
}

/// Every run, then the verdict
pub fn print_comparison(comparison: &Comparison) {
    print_run_stats(&comparison.reference);
    for candidate in &comparison.candidates {
        print_run_stats(candidate);
    }

    println!("{}", style(RULE).cyan());
    match (comparison.best_candidate(), comparison.edge_pct()) {
        (Some(best), Some(edge)) if edge > 0.0 => println!(
            "{} {} beats {} by {:.4} pp",
            style("✓").green(),
            style(&best.label).green().bold(),
            comparison.reference.label,
            edge
        ),
        (Some(best), Some(edge)) => println!(
            "{} {} trails {} by {:.4} pp",
            style("✗").red(),
            style(&best.label).yellow().bold(),
            comparison.reference.label,
            -edge
        ),
        _ => println!("{}", style("No candidate policy to compare.").yellow()),
    }
    println!("{}", style(RULE).cyan());
    println!();
}

fn colored_pct(value: f64) -> String {
    let text = format!("{:.4}%", value);
    if value >= 0.0 {
        style(text).green().to_string()
    } else {
        style(text).red().to_string()
    }
}
