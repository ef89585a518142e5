use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_GMGN_BUILD_ID, DEFAULT_PROXY, DEFAULT_USER_AGENT};

/// Default config file path.
pub const CONFIG_PATH: &str = "config.toml";

/// Top-level application config deserialized from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
}

/// Where address lists are read from and results are written to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the per-channel address lists (`.json` / `.txt`).
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    /// Consolidated JSON results.
    #[serde(default = "default_output_json")]
    pub output_json: PathBuf,
    /// Consolidated text results (`address  label` lines).
    #[serde(default = "default_output_txt")]
    pub output_txt: PathBuf,
}

/// Browser session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Proxy URL handed to Chrome. Empty string disables the proxy.
    #[serde(default = "default_proxy")]
    pub proxy: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// gmgn.ai Next.js build id used in the data route.
    #[serde(default = "default_build_id")]
    pub build_id: String,
    /// Timeout for one navigate-and-read session, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Pause between consecutive addresses, in seconds.
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
    /// Explicit Chrome binary. Autodetected when unset.
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("ad_json")
}

fn default_output_json() -> PathBuf {
    PathBuf::from("ad.json")
}

fn default_output_txt() -> PathBuf {
    PathBuf::from("ad_txt").join("addresses.txt")
}

fn default_proxy() -> String {
    DEFAULT_PROXY.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_build_id() -> String {
    DEFAULT_GMGN_BUILD_ID.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_delay_secs() -> u64 {
    2
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_json: default_output_json(),
            output_txt: default_output_txt(),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            proxy: default_proxy(),
            user_agent: default_user_agent(),
            build_id: default_build_id(),
            timeout_secs: default_timeout_secs(),
            delay_secs: default_delay_secs(),
            chrome_path: None,
        }
    }
}

impl ScraperConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }

    /// The proxy to route through, or `None` when disabled.
    pub fn proxy_server(&self) -> Option<&str> {
        let proxy = self.proxy.trim();
        (!proxy.is_empty()).then_some(proxy)
    }
}

impl AppConfig {
    /// Load config from the given TOML file path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Load config if the file exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
