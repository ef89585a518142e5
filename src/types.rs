use serde::{Deserialize, Serialize};

/// An address/label pair as stored in the per-channel address lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressItem {
    pub address: String,
    pub label: String,
}

/// A wallet that passed screening, labelled with the numbers it passed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenResult {
    pub address: String,
    pub label: String,
}

/// Statistics scraped from a wallet's gmgn.ai address page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WalletStats {
    pub total_profit: f64,
    pub sol_balance: f64,
    pub win_rate: f64,
    pub twitter_name: String,
}

/// One entry of a chain.fm channel listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelWallet {
    pub address: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub labels: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Outcome of fetching a single channel, emitted by `fetch-channel`.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelReport {
    pub timestamp: String,
    pub channel_id: String,
    pub wallets_listed: usize,
    pub wallets_saved: usize,
    pub output_path: String,
}

/// Final summary of a screening run.
#[derive(Debug, Clone, Serialize)]
pub struct ScreenSummary {
    pub timestamp: String,
    pub files_processed: usize,
    pub files_deleted: usize,
    pub addresses_screened: usize,
    pub addresses_failed: usize,
    /// Results loaded from a previous run's output.
    pub resumed_results: usize,
    /// Qualifying results accumulated before dedup (includes resumed ones).
    pub raw_results: usize,
    pub deduplicated_results: usize,
    pub output_json: String,
    pub output_txt: String,
}
