// src/config.rs

//! Manages server configuration: loading, environment overrides, and validation.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Environment variable that overrides `ledger.rpc_url`.
pub const RPC_URL_ENV: &str = "SOLANA_RPC";

/// The public mainnet-beta endpoint used when no RPC url is configured.
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// CAIP-2 id of Solana mainnet-beta, advertised in `X-Blockchain-Ids`.
pub const MAINNET_BLOCKCHAIN_ID: &str = "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp";

/// Settings for the ledger JSON-RPC client.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LedgerConfig {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Upper bound for a single ledger call, e.g. `"10s"` or `"750ms"`.
    #[serde(default = "default_ledger_timeout", with = "humantime_serde")]
    pub timeout: Duration,
    /// Whether `getSignatureStatuses` should search beyond the recent status cache.
    #[serde(default = "default_search_transaction_history")]
    pub search_transaction_history: bool,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}
fn default_ledger_timeout() -> Duration {
    Duration::from_secs(10)
}
fn default_search_transaction_history() -> bool {
    true
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            timeout: default_ledger_timeout(),
            search_transaction_history: default_search_transaction_history(),
        }
    }
}

/// Settings for the transactions and headers produced by the action routes.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ActionConfig {
    /// Priority fee attached to every built transaction.
    #[serde(default = "default_compute_unit_price")]
    pub compute_unit_price_micro_lamports: u64,
    /// Value of the `X-Action-Version` response header.
    #[serde(default = "default_action_version")]
    pub action_version: String,
    /// Value of the `X-Blockchain-Ids` response header.
    #[serde(default = "default_blockchain_id")]
    pub blockchain_id: String,
}

fn default_compute_unit_price() -> u64 {
    1000
}
fn default_action_version() -> String {
    "2.4".to_string()
}
fn default_blockchain_id() -> String {
    MAINNET_BLOCKCHAIN_ID.to_string()
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            compute_unit_price_micro_lamports: default_compute_unit_price(),
            action_version: default_action_version(),
            blockchain_id: default_blockchain_id(),
        }
    }
}

/// Configuration for the Prometheus metrics exporter.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MetricsConfig {
    /// If true, an HTTP server will be started to expose Prometheus metrics.
    #[serde(default)]
    pub enabled: bool,
    /// The port for the Prometheus metrics server.
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

fn default_metrics_port() -> u16 {
    9464
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

/// Represents the final, validated server configuration.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Origin used to build absolute asset URLs. Falls back to the request's `Host`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub action: ActionConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            public_url: None,
            ledger: LedgerConfig::default(),
            action: ActionConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance by reading and parsing a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML from '{path}'"))?;

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Builds the default configuration, still honoring environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides using `lookup` to resolve environment variables.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(RPC_URL_ENV).filter(|v| !v.trim().is_empty()) {
            info!("Using ledger RPC endpoint from {}", RPC_URL_ENV);
            self.ledger.rpc_url = url.trim().to_string();
        }
    }

    /// Validates the configuration to ensure logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("port cannot be 0"));
        }
        if self.host.trim().is_empty() {
            return Err(anyhow!("host cannot be empty"));
        }

        let rpc_url = Url::parse(&self.ledger.rpc_url)
            .with_context(|| format!("Invalid ledger.rpc_url '{}'", self.ledger.rpc_url))?;
        if !matches!(rpc_url.scheme(), "http" | "https") {
            return Err(anyhow!(
                "ledger.rpc_url must use http or https, got '{}'",
                rpc_url.scheme()
            ));
        }
        if self.ledger.timeout.is_zero() {
            return Err(anyhow!("ledger.timeout cannot be 0"));
        }
        if self.ledger.timeout > Duration::from_secs(60) {
            warn!(
                "ledger.timeout is {:?}; clients usually give up on actions well before that.",
                self.ledger.timeout
            );
        }

        if let Some(public_url) = &self.public_url {
            Url::parse(public_url)
                .with_context(|| format!("Invalid public_url '{public_url}'"))?;
        }

        if self.action.action_version.trim().is_empty() {
            return Err(anyhow!("action.action_version cannot be empty"));
        }
        if self.action.blockchain_id.trim().is_empty() {
            return Err(anyhow!("action.blockchain_id cannot be empty"));
        }

        if self.metrics.enabled {
            if self.metrics.port == 0 {
                return Err(anyhow!("metrics.port cannot be 0"));
            }
            if self.metrics.port == self.port {
                return Err(anyhow!(
                    "metrics.port cannot be the same as the main server port"
                ));
            }
        }
        Ok(())
    }
}
