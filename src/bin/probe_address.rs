//! Probe: scrape one wallet's gmgn.ai stats
//!
//! Loads the address data route through the configured browser session and
//! prints:
//! - The parsed stats
//! - The label a qualifying result would carry
//! - Whether the wallet qualifies

use std::path::Path;

use anyhow::Result;
use clap::Parser;

use wallet_screener::config::{AppConfig, CONFIG_PATH};
use wallet_screener::engine::{format_label, qualifies};
use wallet_screener::scraper::{BrowserScraper, StatsSource, stats_url};

#[derive(Parser)]
#[command(name = "probe-address", about = "Scrape and judge a single wallet")]
struct Cli {
    /// Solana wallet address
    address: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load_or_default(Path::new(CONFIG_PATH))?;

    println!("=== Probe: {} ===", cli.address);
    println!("URL:   {}", stats_url(&config.scraper.build_id, &cli.address));
    println!("Proxy: {}", config.scraper.proxy_server().unwrap_or("none"));
    println!();

    let scraper = BrowserScraper::new(config.scraper);
    let stats = scraper.wallet_stats(&cli.address).await?;

    println!("--- Stats ---");
    println!("{}", serde_json::to_string_pretty(&stats)?);
    println!();
    println!("Label:     {}", format_label(&stats));
    println!(
        "Qualifies: {}",
        if qualifies(stats.total_profit, stats.sol_balance, stats.win_rate) {
            "yes"
        } else {
            "no"
        }
    );

    Ok(())
}
