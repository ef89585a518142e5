use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::engine::dedup_and_filter;
use crate::store;
use crate::types::{ScreenResult, ScreenSummary};

/// Running state of a screening pass: accumulated results and counters.
#[derive(Debug, Default)]
pub struct ScreenState {
    /// Every qualifying result so far, duplicates included.
    pub results: Vec<ScreenResult>,
    /// How many of `results` were loaded from a previous run.
    pub resumed: usize,
    pub files_processed: usize,
    pub files_deleted: usize,
    pub addresses_screened: usize,
    pub addresses_failed: usize,
}

impl ScreenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the results a previous run left at `path`, if any.
    ///
    /// A missing or unreadable file starts an empty state.
    pub fn resume(path: &Path) -> Self {
        if !path.exists() {
            return Self::new();
        }
        match store::read_results(path) {
            Ok(results) => {
                info!("Resumed {} result(s) from {}", results.len(), path.display());
                Self {
                    resumed: results.len(),
                    results,
                    ..Self::default()
                }
            }
            Err(e) => {
                warn!("Ignoring previous results: {e:#}");
                Self::new()
            }
        }
    }

    /// Append the qualifying results of one file.
    pub fn record_file(&mut self, results: Vec<ScreenResult>) {
        self.results.extend(results);
    }

    /// Write the running (not yet deduplicated) result list.
    pub fn persist(&self, path: &Path) -> Result<()> {
        store::write_results(path, &self.results)?;
        info!(
            "Saved running results to {}, {} qualifying so far",
            path.display(),
            self.results.len()
        );
        Ok(())
    }

    /// Deduplicated view of the accumulated results.
    pub fn deduplicated(&self) -> Vec<ScreenResult> {
        dedup_and_filter(self.results.clone())
    }

    pub fn summary(&self, deduplicated: usize, output_json: &Path, output_txt: &Path) -> ScreenSummary {
        ScreenSummary {
            timestamp: chrono::Utc::now().to_rfc3339(),
            files_processed: self.files_processed,
            files_deleted: self.files_deleted,
            addresses_screened: self.addresses_screened,
            addresses_failed: self.addresses_failed,
            resumed_results: self.resumed,
            raw_results: self.results.len(),
            deduplicated_results: deduplicated,
            output_json: output_json.display().to_string(),
            output_txt: output_txt.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn result(address: &str, win_rate: f64) -> ScreenResult {
        ScreenResult {
            address: address.to_string(),
            label: format!("profit:20000.00,balance:1.00,winrate:{win_rate:.3},name:"),
        }
    }

    #[test]
    fn resume_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let state = ScreenState::resume(&dir.path().join("ad.json"));
        assert!(state.results.is_empty());
        assert_eq!(state.resumed, 0);
    }

    #[test]
    fn resume_corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ad.json");
        std::fs::write(&path, "not json").unwrap();
        let state = ScreenState::resume(&path);
        assert!(state.results.is_empty());
    }

    #[test]
    fn persist_then_resume() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ad.json");
        let mut state = ScreenState::new();
        state.record_file(vec![result("A", 0.8), result("B", 0.9)]);
        state.record_file(vec![result("A", 0.85)]);
        state.persist(&path).unwrap();

        let resumed = ScreenState::resume(&path);
        assert_eq!(resumed.resumed, 3);
        assert_eq!(resumed.results, state.results);
        let summary = resumed.summary(2, &path, Path::new("addresses.txt"));
        assert_eq!(summary.resumed_results, 3);
        assert_eq!(summary.raw_results, 3);
    }

    #[test]
    fn deduplicated_collapses_addresses() {
        let mut state = ScreenState::new();
        state.record_file(vec![result("A", 0.8), result("B", 0.9), result("A", 0.85)]);
        let dedup = state.deduplicated();
        assert_eq!(dedup, vec![result("A", 0.85), result("B", 0.9)]);
        // The raw list is left untouched.
        assert_eq!(state.results.len(), 3);
    }

    #[test]
    fn summary_counts() {
        let mut state = ScreenState::new();
        state.files_processed = 2;
        state.files_deleted = 1;
        state.addresses_screened = 5;
        state.addresses_failed = 1;
        state.record_file(vec![result("A", 0.8), result("A", 0.9)]);
        let summary = state.summary(1, Path::new("ad.json"), Path::new("ad_txt/addresses.txt"));
        assert_eq!(summary.raw_results, 2);
        assert_eq!(summary.deduplicated_results, 1);
        assert_eq!(summary.files_deleted, 1);
        assert_eq!(summary.resumed_results, 0);
        assert_eq!(summary.output_txt, "ad_txt/addresses.txt");
    }
}
