//! fetch-channel — save the labelled wallets of chain.fm buy channels.
//!
//! For every channel ID given on the command line, lists the channel's
//! wallets and writes those carrying a label to `<out-dir>/<channel>.json`.
//! A channel that fails is reported and skipped.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use wallet_screener::api::{fetch_channel, labeled_addresses};
use wallet_screener::reporter;
use wallet_screener::store::write_address_file;
use wallet_screener::types::ChannelReport;

#[derive(Parser)]
#[command(name = "fetch-channel", about = "Save labelled wallets of chain.fm channels")]
struct Args {
    /// One or more chain.fm channel IDs
    #[arg(required = true)]
    channel_ids: Vec<String>,

    /// Directory the `<channel>.json` files are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    let client = reqwest::Client::new();
    let mut failures = 0;
    for channel_id in &args.channel_ids {
        info!("Processing channel {channel_id}");
        match save_channel(&client, channel_id, &args.out_dir).await {
            Ok(report) => {
                info!(
                    "Saved {} of {} wallet(s) to {}",
                    report.wallets_saved, report.wallets_listed, report.output_path
                );
                reporter::report_channel(&report);
            }
            Err(e) => {
                failures += 1;
                warn!("Channel {channel_id} failed: {e:#}");
            }
        }
    }

    info!(
        "Done: {} channel(s) saved, {failures} failed",
        args.channel_ids.len() - failures
    );
    Ok(())
}

async fn save_channel(
    client: &reqwest::Client,
    channel_id: &str,
    out_dir: &Path,
) -> Result<ChannelReport> {
    let wallets = fetch_channel(client, channel_id).await?;
    let listed = wallets.len();
    let items = labeled_addresses(wallets);

    let path = out_dir.join(format!("{channel_id}.json"));
    write_address_file(&path, &items)?;

    Ok(ChannelReport {
        timestamp: chrono::Utc::now().to_rfc3339(),
        channel_id: channel_id.to_string(),
        wallets_listed: listed,
        wallets_saved: items.len(),
        output_path: path.display().to_string(),
    })
}
