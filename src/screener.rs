use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::PathsConfig;
use crate::engine::evaluate;
use crate::scraper::StatsSource;
use crate::state::ScreenState;
use crate::store;
use crate::types::{AddressItem, ScreenResult, ScreenSummary};

/// Screens every address list in the input directory against a stats source.
pub struct Screener<S> {
    source: S,
    paths: PathsConfig,
    delay: Duration,
}

impl<S: StatsSource> Screener<S> {
    pub fn new(source: S, paths: PathsConfig, delay: Duration) -> Self {
        Self {
            source,
            paths,
            delay,
        }
    }

    /// Run a full pass.
    ///
    /// Each input file is rewritten to keep only its qualifying addresses, or
    /// deleted when none qualify. The running result list is saved after
    /// every file so an interrupted run can be resumed. Finally the results
    /// are deduplicated and written as JSON and text.
    pub async fn run(&self) -> Result<ScreenSummary> {
        let files = list_address_files(&self.paths.input_dir)?;
        info!(
            "Found {} address file(s) in {}",
            files.len(),
            self.paths.input_dir.display()
        );

        let mut state = ScreenState::resume(&self.paths.output_json);

        for path in &files {
            let results = self.screen_file(path, &mut state).await;
            if !results.is_empty() {
                state.record_file(results);
                if let Err(e) = state.persist(&self.paths.output_json) {
                    warn!("Failed to save running results: {e:#}");
                }
            }
        }

        let deduplicated = state.deduplicated();
        store::write_results(&self.paths.output_json, &deduplicated)?;

        let labels = original_labels(&self.paths.input_dir)?;
        let rows = deduplicated.iter().map(|r| match labels.get(&r.address) {
            Some(label) => (r.address.as_str(), label.as_str()),
            None => {
                warn!("No original label for {}, using screening label", r.address);
                (r.address.as_str(), r.label.as_str())
            }
        });
        store::write_text_report(&self.paths.output_txt, rows)?;

        info!(
            "Screening complete: {} raw result(s), {} after dedup",
            state.results.len(),
            deduplicated.len()
        );
        Ok(state.summary(
            deduplicated.len(),
            &self.paths.output_json,
            &self.paths.output_txt,
        ))
    }

    /// Screen one file and rewrite or delete it. Returns its qualifying results.
    async fn screen_file(&self, path: &Path, state: &mut ScreenState) -> Vec<ScreenResult> {
        let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
        let items = match store::read_address_file(path) {
            Ok(items) => items,
            Err(e) => {
                warn!("Skipping {name}: {e:#}");
                return Vec::new();
            }
        };
        info!("Screening {} address(es) from {name}", items.len());
        state.files_processed += 1;

        let mut kept: Vec<AddressItem> = Vec::new();
        let mut results = Vec::new();
        for item in items {
            state.addresses_screened += 1;
            match self.source.wallet_stats(&item.address).await {
                Ok(stats) => {
                    if let Some(result) = evaluate(&item.address, &stats) {
                        results.push(result);
                        kept.push(item);
                    }
                }
                Err(e) => {
                    state.addresses_failed += 1;
                    warn!("Failed to screen {}: {e:#}", item.address);
                }
            }
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        if kept.is_empty() {
            match fs::remove_file(path) {
                Ok(()) => {
                    state.files_deleted += 1;
                    info!("No qualifying addresses in {name}, deleted");
                }
                Err(e) => warn!("Failed to delete {name}: {e}"),
            }
        } else {
            match store::write_address_file(path, &kept) {
                Ok(()) => info!("Updated {name}, kept {} qualifying address(es)", kept.len()),
                Err(e) => warn!("Failed to update {name}: {e:#}"),
            }
        }

        results
    }
}

/// Address list files in `dir`, sorted by file name.
pub fn list_address_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| store::is_address_file(path))
        .collect();
    files.sort();
    Ok(files)
}

/// Map each address to the label it carries in the input lists.
/// When an address appears in several files the later file wins.
pub fn original_labels(dir: &Path) -> Result<HashMap<String, String>> {
    let mut labels = HashMap::new();
    for path in list_address_files(dir)? {
        match store::read_address_file(&path) {
            Ok(items) => {
                for item in items {
                    labels.insert(item.address, item.label);
                }
            }
            Err(e) => warn!("Failed to read {}: {e:#}", path.display()),
        }
    }
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WalletStats;
    use anyhow::anyhow;
    use std::cell::RefCell;
    use tempfile::{TempDir, tempdir};

    /// Serves canned stats; unknown addresses fail like a broken page load.
    #[derive(Default)]
    struct StubSource {
        stats: HashMap<String, WalletStats>,
        calls: RefCell<Vec<String>>,
        called_at: RefCell<Vec<tokio::time::Instant>>,
    }

    impl StubSource {
        fn with(mut self, address: &str, profit: f64, balance: f64, win_rate: f64) -> Self {
            self.stats.insert(
                address.to_string(),
                WalletStats {
                    total_profit: profit,
                    sol_balance: balance,
                    win_rate,
                    twitter_name: format!("@{address}"),
                },
            );
            self
        }
    }

    impl StatsSource for StubSource {
        async fn wallet_stats(&self, address: &str) -> Result<WalletStats> {
            self.calls.borrow_mut().push(address.to_string());
            self.called_at.borrow_mut().push(tokio::time::Instant::now());
            self.stats
                .get(address)
                .cloned()
                .ok_or_else(|| anyhow!("page load failed"))
        }
    }

    fn item(address: &str, label: &str) -> AddressItem {
        AddressItem {
            address: address.to_string(),
            label: label.to_string(),
        }
    }

    fn paths(root: &TempDir) -> PathsConfig {
        let input_dir = root.path().join("ad_json");
        fs::create_dir_all(&input_dir).unwrap();
        PathsConfig {
            input_dir,
            output_json: root.path().join("ad.json"),
            output_txt: root.path().join("ad_txt").join("addresses.txt"),
        }
    }

    #[tokio::test]
    async fn full_pass_rewrites_inputs_and_writes_outputs() {
        let root = tempdir().unwrap();
        let paths = paths(&root);
        let a_json = paths.input_dir.join("a.json");
        let b_txt = paths.input_dir.join("b.txt");
        let c_json = paths.input_dir.join("c.json");
        store::write_address_file(&a_json, &[item("W1", "whale"), item("W2", "meh")]).unwrap();
        fs::write(&b_txt, "address  label\nW3  sharp trader\nW1  whale again\nW4  broken\n").unwrap();
        store::write_address_file(&c_json, &[item("W5", "dud")]).unwrap();
        fs::write(paths.input_dir.join("notes.md"), "ignored").unwrap();

        let source = StubSource::default()
            .with("W1", 2_000_000.0, 50.0, 0.3)
            .with("W2", 5_000.0, 1.0, 0.9)
            .with("W3", 15_000.0, 0.5, 0.8)
            .with("W5", 0.0, 0.0, 0.0);
        let screener = Screener::new(source, paths.clone(), Duration::ZERO);
        let summary = screener.run().await.unwrap();

        // Inputs: a.json keeps W1, b.txt keeps W3 and W1, c.json is gone.
        assert_eq!(store::read_address_file(&a_json).unwrap(), vec![item("W1", "whale")]);
        assert_eq!(
            fs::read_to_string(&b_txt).unwrap(),
            "address  label\nW3  sharp trader\nW1  whale again\n"
        );
        assert!(!c_json.exists());
        assert!(paths.input_dir.join("notes.md").exists());

        // Consolidated JSON: one record per address.
        let results = store::read_results(&paths.output_json).unwrap();
        let addresses: Vec<&str> = results.iter().map(|r| r.address.as_str()).collect();
        assert_eq!(addresses, vec!["W1", "W3"]);
        assert_eq!(
            results[1].label,
            "profit:15000.00,balance:0.50,winrate:0.800,name:@W3"
        );

        // Text report: original labels, the later file winning for W1.
        assert_eq!(
            fs::read_to_string(&paths.output_txt).unwrap(),
            "address  label\nW1  whale again\nW3  sharp trader\n"
        );

        assert_eq!(summary.files_processed, 3);
        assert_eq!(summary.files_deleted, 1);
        assert_eq!(summary.addresses_screened, 6);
        assert_eq!(summary.addresses_failed, 1);
        assert_eq!(summary.resumed_results, 0);
        assert_eq!(summary.raw_results, 3);
        assert_eq!(summary.deduplicated_results, 2);
        assert_eq!(
            *screener.source.calls.borrow(),
            vec!["W1", "W2", "W3", "W1", "W4", "W5"]
        );
    }

    #[tokio::test]
    async fn previous_results_are_merged() {
        let root = tempdir().unwrap();
        let paths = paths(&root);
        store::write_results(
            &paths.output_json,
            &[
                ScreenResult {
                    address: "OLD".into(),
                    label: "profit:20000.00,balance:1.00,winrate:0.900,name:".into(),
                },
                ScreenResult {
                    address: "W1".into(),
                    label: "profit:20000.00,balance:1.00,winrate:0.990,name:old".into(),
                },
            ],
        )
        .unwrap();
        store::write_address_file(&paths.input_dir.join("a.json"), &[item("W1", "whale")]).unwrap();

        let source = StubSource::default().with("W1", 20_000.0, 1.0, 0.8);
        let summary = Screener::new(source, paths.clone(), Duration::ZERO)
            .run()
            .await
            .unwrap();

        let results = store::read_results(&paths.output_json).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].address, "W1");
        assert!(results[1].label.ends_with("name:old"));
        assert_eq!(summary.resumed_results, 2);
        assert_eq!(summary.raw_results, 3);

        // OLD is in no input list, so the text report falls back to its result label.
        let txt = fs::read_to_string(&paths.output_txt).unwrap();
        assert!(txt.contains("OLD  profit:20000.00,balance:1.00,winrate:0.900,name:\n"));
        assert!(txt.contains("W1  whale\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn delay_follows_every_address() {
        let root = tempdir().unwrap();
        let paths = paths(&root);
        store::write_address_file(
            &paths.input_dir.join("a.json"),
            &[item("W1", "whale"), item("W2", "broken")],
        )
        .unwrap();

        let source = StubSource::default().with("W1", 20_000.0, 1.0, 0.9);
        let screener = Screener::new(source, paths.clone(), Duration::from_secs(2));
        let start = tokio::time::Instant::now();
        let summary = screener.run().await.unwrap();
        let elapsed = start.elapsed();

        assert_eq!(summary.addresses_screened, 2);
        assert_eq!(summary.addresses_failed, 1);
        // One pause after the success and one after the failure.
        assert!(elapsed >= Duration::from_secs(4), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(5), "elapsed {elapsed:?}");

        let called_at = screener.source.called_at.borrow();
        assert_eq!(called_at.len(), 2);
        assert!(called_at[1] - called_at[0] >= Duration::from_secs(2));
    }

    #[tokio::test]
    async fn null_list_is_deleted() {
        let root = tempdir().unwrap();
        let paths = paths(&root);
        let empty = paths.input_dir.join("chan.json");
        fs::write(&empty, "null").unwrap();

        let summary = Screener::new(StubSource::default(), paths.clone(), Duration::ZERO)
            .run()
            .await
            .unwrap();
        assert!(!empty.exists());
        assert_eq!(summary.files_processed, 1);
        assert_eq!(summary.files_deleted, 1);
        assert_eq!(summary.addresses_screened, 0);
    }

    #[tokio::test]
    async fn empty_input_dir_writes_empty_outputs() {
        let root = tempdir().unwrap();
        let paths = paths(&root);
        let summary = Screener::new(StubSource::default(), paths.clone(), Duration::ZERO)
            .run()
            .await
            .unwrap();
        assert_eq!(summary.files_processed, 0);
        assert!(store::read_results(&paths.output_json).unwrap().is_empty());
        assert_eq!(fs::read_to_string(&paths.output_txt).unwrap(), "address  label\n");
    }

    #[tokio::test]
    async fn unreadable_file_is_skipped_and_kept() {
        let root = tempdir().unwrap();
        let paths = paths(&root);
        let bad = paths.input_dir.join("bad.json");
        fs::write(&bad, "{ broken").unwrap();

        let summary = Screener::new(StubSource::default(), paths.clone(), Duration::ZERO)
            .run()
            .await
            .unwrap();
        assert!(bad.exists());
        assert_eq!(summary.files_processed, 0);
    }

    #[tokio::test]
    async fn missing_input_dir_is_an_error() {
        let root = tempdir().unwrap();
        let mut paths = paths(&root);
        paths.input_dir = root.path().join("nowhere");
        let outcome = Screener::new(StubSource::default(), paths, Duration::ZERO)
            .run()
            .await;
        assert!(outcome.is_err());
    }

    #[test]
    fn files_are_listed_in_name_order() {
        let dir = tempdir().unwrap();
        for name in ["b.txt", "a.json", "c.csv", "d.json"] {
            fs::write(dir.path().join(name), "[]").unwrap();
        }
        fs::create_dir(dir.path().join("sub.json")).unwrap();
        let names: Vec<String> = list_address_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "b.txt", "d.json"]);
    }
}
