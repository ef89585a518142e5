use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use wallet_screener::config::{AppConfig, CONFIG_PATH};
use wallet_screener::reporter;
use wallet_screener::scraper::BrowserScraper;
use wallet_screener::screener::Screener;

#[derive(Parser)]
#[command(
    name = "screen-addresses",
    about = "Screen saved wallet lists against gmgn.ai stats and keep the profitable ones"
)]
struct Args {
    /// Config file (defaults are used if it does not exist)
    #[arg(long, default_value = CONFIG_PATH)]
    config: PathBuf,

    /// Directory holding the address lists
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Consolidated JSON output
    #[arg(long)]
    output_json: Option<PathBuf>,

    /// Consolidated text output
    #[arg(long)]
    output_txt: Option<PathBuf>,

    /// Browser proxy, e.g. socks5://127.0.0.1:10808 (empty to disable)
    #[arg(long)]
    proxy: Option<String>,

    /// Seconds to wait between addresses
    #[arg(long)]
    delay_secs: Option<u64>,
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
    let mut config = AppConfig::load_or_default(&args.config)?;

    if let Some(dir) = args.input_dir {
        config.paths.input_dir = dir;
    }
    if let Some(path) = args.output_json {
        config.paths.output_json = path;
    }
    if let Some(path) = args.output_txt {
        config.paths.output_txt = path;
    }
    if let Some(proxy) = args.proxy {
        config.scraper.proxy = proxy;
    }
    if let Some(secs) = args.delay_secs {
        config.scraper.delay_secs = secs;
    }

    info!(
        "Starting screening: input={} proxy={} build={} delay={}s timeout={}s",
        config.paths.input_dir.display(),
        config.scraper.proxy_server().unwrap_or("none"),
        config.scraper.build_id,
        config.scraper.delay_secs,
        config.scraper.timeout_secs,
    );

    let delay = config.scraper.delay();
    let scraper = BrowserScraper::new(config.scraper);
    let screener = Screener::new(scraper, config.paths, delay);
    let summary = screener.run().await?;

    reporter::report_screen_summary(&summary);
    Ok(())
}
