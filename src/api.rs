use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::CHANNEL_API_URL;
use crate::types::{AddressItem, ChannelWallet};

/// One element of a tRPC batch response.
#[derive(Debug, Deserialize)]
struct BatchEntry {
    result: BatchResult,
}

#[derive(Debug, Deserialize)]
struct BatchResult {
    data: BatchData,
}

#[derive(Debug, Deserialize)]
struct BatchData {
    #[serde(default)]
    json: Vec<ChannelWallet>,
}

/// Build the listing URL for a channel.
///
/// The upstream procedure expects the input key spelled `chanelId`.
pub fn channel_url(channel_id: &str) -> Result<Url> {
    let input = json!({ "0": { "json": { "chanelId": channel_id } } }).to_string();
    let url = Url::parse_with_params(CHANNEL_API_URL, &[("batch", "1"), ("input", input.as_str())])?;
    Ok(url)
}

/// Parse a tRPC batch response body into the wallets of its first entry.
pub fn parse_channel_response(body: &str) -> Result<Vec<ChannelWallet>> {
    let batch: Vec<BatchEntry> =
        serde_json::from_str(body).context("failed to parse channel response")?;
    match batch.into_iter().next() {
        Some(entry) => Ok(entry.result.data.json),
        None => bail!("channel response contained no batch entries"),
    }
}

/// Fetch every wallet listed under the given channel.
pub async fn fetch_channel(client: &reqwest::Client, channel_id: &str) -> Result<Vec<ChannelWallet>> {
    let url = channel_url(channel_id)?;
    let resp = client
        .get(url)
        .send()
        .await
        .context("channel request failed")?;
    let status = resp.status();
    let body = resp.text().await.context("failed to read channel response")?;
    if !status.is_success() {
        bail!("channel API returned {status}: {body}");
    }
    let wallets = parse_channel_response(&body)?;
    debug!("Fetched {} wallets for channel {channel_id}", wallets.len());
    Ok(wallets)
}

/// Keep wallets that carry at least one label, labelled with the first one.
pub fn labeled_addresses(wallets: Vec<ChannelWallet>) -> Vec<AddressItem> {
    wallets
        .into_iter()
        .filter_map(|w| {
            let label = w.labels.into_iter().next()?;
            Some(AddressItem {
                address: w.address,
                label,
            })
        })
        .collect()
}
