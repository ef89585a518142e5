use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use headless_chrome::{Browser, LaunchOptions};
use serde_json::Value;
use tracing::debug;

use crate::GMGN_DATA_BASE;
use crate::config::ScraperConfig;
use crate::engine::leading_float;
use crate::types::WalletStats;

/// How long Chrome may sit idle before the session is torn down.
/// Kept above the navigation timeout so it never fires first.
const IDLE_GRACE: Duration = Duration::from_secs(10);

/// Time budget shared by every step of one browser session.
#[derive(Debug, Clone, Copy)]
struct SessionDeadline {
    at: Instant,
    budget: Duration,
}

impl SessionDeadline {
    fn new(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    /// Time left before the deadline, or an error once it has passed.
    fn remaining(&self) -> Result<Duration> {
        let left = self.at.saturating_duration_since(Instant::now());
        if left.is_zero() {
            bail!("timed out after {}s", self.budget.as_secs_f64());
        }
        Ok(left)
    }
}

/// Run a blocking browser session to completion on the blocking pool.
///
/// The session bounds itself; it is always awaited so no Chrome outlives it.
async fn run_session<F>(session: F) -> Result<String>
where
    F: FnOnce() -> Result<String> + Send + 'static,
{
    tokio::task::spawn_blocking(session)
        .await
        .context("browser task panicked")?
}

/// Anything that can produce statistics for a wallet address.
#[allow(async_fn_in_trait)]
pub trait StatsSource {
    async fn wallet_stats(&self, address: &str) -> Result<WalletStats>;
}

/// gmgn.ai data route for an address page.
pub fn stats_url(build_id: &str, address: &str) -> String {
    format!("{GMGN_DATA_BASE}/{build_id}/sol/address/{address}.json?chain=sol")
}

/// Parse the JSON document served on the address data route.
///
/// Numeric fields may be numbers, numeric strings, or absent; anything
/// unreadable counts as zero.
pub fn parse_stats_page(body: &str) -> Result<WalletStats> {
    let page: Value = serde_json::from_str(body.trim()).context("address page is not JSON")?;
    let info = page
        .pointer("/pageProps/addressInfo")
        .cloned()
        .unwrap_or(Value::Null);

    Ok(WalletStats {
        total_profit: parse_f64(&info, "total_profit"),
        sol_balance: parse_f64(&info, "sol_balance"),
        win_rate: parse_f64(&info, "winrate"),
        twitter_name: info
            .get("twitter_name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
    })
}

fn parse_f64(val: &Value, field: &str) -> f64 {
    val.get(field)
        .and_then(|v| v.as_f64().or_else(|| v.as_str().and_then(leading_float)))
        .unwrap_or(0.0)
}

/// Scrapes gmgn.ai through a fresh headless Chrome session per address.
#[derive(Debug, Clone)]
pub struct BrowserScraper {
    config: ScraperConfig,
}

impl BrowserScraper {
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }

    /// Launch Chrome, load the page, and return the text of its body.
    ///
    /// Each step only gets what is left of the session deadline.
    fn load_page_text(config: &ScraperConfig, url: &str) -> Result<String> {
        let deadline = SessionDeadline::new(config.timeout());
        let launch = LaunchOptions::default_builder()
            .headless(true)
            .proxy_server(config.proxy_server())
            .path(config.chrome_path.clone())
            .idle_browser_timeout(config.timeout() + IDLE_GRACE)
            .build()
            .map_err(|e| anyhow!("invalid browser launch options: {e}"))?;

        let browser = Browser::new(launch).context("failed to launch browser")?;
        let tab = browser.new_tab().context("failed to open tab")?;
        tab.set_user_agent(&config.user_agent, None, None)
            .context("failed to set user agent")?;
        tab.set_default_timeout(deadline.remaining()?);
        tab.navigate_to(url)
            .context("navigation failed")?
            .wait_until_navigated()
            .context("page did not finish loading")?;
        tab.set_default_timeout(deadline.remaining()?);
        let body = tab.wait_for_element("body").context("page has no body")?;
        body.get_inner_text().context("failed to read page text")
    }
}

impl StatsSource for BrowserScraper {
    async fn wallet_stats(&self, address: &str) -> Result<WalletStats> {
        let url = stats_url(&self.config.build_id, address);
        debug!("Loading {url}");

        let config = self.config.clone();
        let text = run_session(move || Self::load_page_text(&config, &url)).await?;

        parse_stats_page(&text)
    }
}
