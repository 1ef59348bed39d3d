use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{API_BASE, IP_LOOKUP_URL};

/// Default config file path.
pub const CONFIG_PATH: &str = "config.toml";

/// Top-level application config deserialized from `config.toml`.
///
/// Every field carries a default, so a missing file (or any missing table)
/// yields the stock behavior: `token.txt` / `proxies.txt` / `id.txt` next to
/// the binary, liveness pings 5s apart every 15s, a connect cycle every 60s.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Input and output file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Bearer tokens, one per line. Required non-empty at startup.
    #[serde(default = "default_tokens_file")]
    pub tokens: String,
    /// Proxy URLs in `scheme://[user:pass@]host:port` form, optional.
    #[serde(default = "default_proxies_file")]
    pub proxies: String,
    /// Identifier candidates offered by the startup menu, optional.
    #[serde(default = "default_identifiers_file")]
    pub identifiers: String,
    /// Append-only event log, one line per event.
    #[serde(default = "default_event_log")]
    pub event_log: String,
}

/// Timer periods for the per-account sequences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Delay between consecutive liveness pings within one sequence.
    #[serde(default = "default_liveness_delay")]
    pub liveness_delay_secs: u64,
    /// Period of the repeating liveness sequence.
    #[serde(default = "default_liveness_interval")]
    pub liveness_interval_secs: u64,
    /// Period of the repeating connect sequence.
    #[serde(default = "default_connect_interval")]
    pub connect_interval_secs: u64,
}

/// Remote endpoints and per-account client tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Rewards API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Public IP lookup endpoint.
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,
    /// Request timeout applied to every account client.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_tokens_file() -> String {
    "token.txt".to_string()
}

fn default_proxies_file() -> String {
    "proxies.txt".to_string()
}

fn default_identifiers_file() -> String {
    "id.txt".to_string()
}

fn default_event_log() -> String {
    "exeos-keeper.log".to_string()
}

fn default_liveness_delay() -> u64 {
    5
}

fn default_liveness_interval() -> u64 {
    15
}

fn default_connect_interval() -> u64 {
    60
}

fn default_api_base() -> String {
    API_BASE.to_string()
}

fn default_ip_lookup_url() -> String {
    IP_LOOKUP_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            tokens: default_tokens_file(),
            proxies: default_proxies_file(),
            identifiers: default_identifiers_file(),
            event_log: default_event_log(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            liveness_delay_secs: default_liveness_delay(),
            liveness_interval_secs: default_liveness_interval(),
            connect_interval_secs: default_connect_interval(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            ip_lookup_url: default_ip_lookup_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl TimingConfig {
    /// Delay between liveness pings. Zero is allowed (back-to-back pings).
    pub fn liveness_delay(&self) -> Duration {
        Duration::from_secs(self.liveness_delay_secs)
    }

    /// Liveness sequence period. Clamped to ≥ 1s; `tokio::time::interval`
    /// panics on a zero period.
    pub fn liveness_interval(&self) -> Duration {
        Duration::from_secs(self.liveness_interval_secs.max(1))
    }

    /// Connect sequence period, clamped like the liveness period.
    pub fn connect_interval(&self) -> Duration {
        Duration::from_secs(self.connect_interval_secs.max(1))
    }
}

impl AppConfig {
    /// Load config from the given TOML file path, or fall back to defaults
    /// when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }
}
