//! Health score job
//!
//! Run with: cargo run -- [--config health.toml] [--json]

use clap::Parser;
use color_eyre::eyre::Result;
use console::style;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use health_score::{Config, ScoreAggregator, ScoreReport};

#[derive(Debug, Parser)]
#[command(name = "health-score", about = "Compute the protocol health score")]
struct Args {
    /// TOML configuration file (defaults to environment / .env)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the full report as JSON instead of the summary
    #[arg(long)]
    json: bool,
}

fn print_banner() {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!(
        "{}",
        style(" 🩺 PROTOCOL HEALTH SCORE").cyan().bold()
    );
    println!(
        "{}",
        style("    TVL | Market Cap | Holders | Transactions").cyan()
    );
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!();
}

fn print_report(report: &ScoreReport) {
    let m = &report.measures;

    println!();
    println!("{}", style("═══ RESULT ═══").blue().bold());
    println!("  TVL:           ${:>18.2}", m.tvl_usd);
    println!("  Market Cap:    ${:>18.2}", m.market_cap_usd);
    println!("  Holders:       {:>19}", m.holders);
    println!("  Transactions:  {:>19}", m.transactions);
    println!();
    for metric in &report.metrics {
        println!(
            "  {:<8} {:.5} / {:.2}",
            metric.metric.to_string(),
            metric.contribution(),
            metric.weight
        );
    }
    println!();
    println!(
        "  {} {}",
        style("Score:").bold(),
        style(format!("{:.5}", report.score)).green().bold()
    );
    println!();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("health_score=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        error!("Please check your .env file or --config");
        return Err(e.into());
    }

    if !args.json {
        print_banner();
        config.print_summary();
    }

    let aggregator = ScoreAggregator::from_config(&config)?;

    info!("Collecting TVL, market cap, holders and transactions...");
    let report = aggregator.compute_report().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}
