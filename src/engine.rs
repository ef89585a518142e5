use std::collections::HashMap;

use tracing::{info, warn};

use crate::types::{ScreenResult, WalletStats};

/// High-profit branch: minimum total profit in USD.
const WHALE_MIN_PROFIT: f64 = 1_000_000.0;
/// High-profit branch: minimum SOL balance.
const WHALE_MIN_BALANCE: f64 = 20.0;
/// High-profit branch: minimum win rate.
const WHALE_MIN_WIN_RATE: f64 = 0.1;

/// Sharp-trader branch: minimum total profit in USD.
const SHARP_MIN_PROFIT: f64 = 10_000.0;
/// Sharp-trader branch: minimum win rate.
const SHARP_MIN_WIN_RATE: f64 = 0.755;

/// Results at or below this win rate never survive dedup.
const DEDUP_MIN_WIN_RATE: f64 = 0.1;

const WIN_RATE_KEY: &str = "winrate:";

/// Whether a wallet qualifies.
///
/// Either a large, funded, not-hopeless wallet, or a smaller one with a
/// very high win rate.
pub fn qualifies(total_profit: f64, sol_balance: f64, win_rate: f64) -> bool {
    (total_profit >= WHALE_MIN_PROFIT
        && sol_balance >= WHALE_MIN_BALANCE
        && win_rate >= WHALE_MIN_WIN_RATE)
        || (total_profit >= SHARP_MIN_PROFIT && win_rate >= SHARP_MIN_WIN_RATE)
}

/// Result label embedding the numbers a wallet was judged on.
pub fn format_label(stats: &WalletStats) -> String {
    format!(
        "profit:{:.2},balance:{:.2},winrate:{:.3},name:{}",
        stats.total_profit, stats.sol_balance, stats.win_rate, stats.twitter_name
    )
}

/// Judge a wallet, logging the verdict. Returns a result only if it qualifies.
pub fn evaluate(address: &str, stats: &WalletStats) -> Option<ScreenResult> {
    let label = format_label(stats);
    if qualifies(stats.total_profit, stats.sol_balance, stats.win_rate) {
        info!("Address {address} qualifies ({label})");
        Some(ScreenResult {
            address: address.to_string(),
            label,
        })
    } else {
        info!("Address {address} does not qualify ({label})");
        None
    }
}

/// Win rate embedded in a result label: the leading number after `winrate:`.
pub fn parse_win_rate(label: &str) -> Option<f64> {
    let (_, rest) = label.split_once(WIN_RATE_KEY)?;
    leading_float(rest)
}

/// Parse the longest numeric prefix of `s` (after leading whitespace).
pub(crate) fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if seen_digit && !seen_exp => {
                // Only consume the exponent if digits follow it.
                let mut j = end + 1;
                if matches!(bytes.get(j), Some(b'+' | b'-')) {
                    j += 1;
                }
                if !bytes.get(j).is_some_and(u8::is_ascii_digit) {
                    break;
                }
                seen_exp = true;
                end = j;
                continue;
            }
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return None;
    }
    s[..end].parse().ok()
}

/// Collapse results to one per address, keeping the highest win rate.
///
/// Results with win rate at or below 0.1, or whose label carries no readable
/// win rate, are dropped. Ties keep the earlier result. Output follows the
/// order in which each surviving address first appeared.
pub fn dedup_and_filter(results: Vec<ScreenResult>) -> Vec<ScreenResult> {
    let mut best: Vec<(ScreenResult, f64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for result in results {
        let Some(win_rate) = parse_win_rate(&result.label) else {
            warn!("Could not read win rate for {}: {:?}", result.address, result.label);
            continue;
        };
        if win_rate <= DEDUP_MIN_WIN_RATE {
            continue;
        }

        match index.get(&result.address).copied() {
            Some(i) => {
                if win_rate > best[i].1 {
                    best[i] = (result, win_rate);
                }
            }
            None => {
                index.insert(result.address.clone(), best.len());
                best.push((result, win_rate));
            }
        }
    }

    best.into_iter().map(|(result, _)| result).collect()
}
