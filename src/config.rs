//! Configuration module for the fraction assembler service
//!
//! Loaded from a TOML file with `.env` support; every section has defaults
//! so a missing file still yields a runnable (if unfunded) configuration.

use crate::rpc_manager::RpcManagerConfig;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener
    #[serde(default)]
    pub server: ServerConfig,

    /// Network client (anchor source)
    #[serde(default)]
    pub rpc: RpcManagerConfig,

    /// Fee payer key location
    #[serde(default)]
    pub wallet: WalletConfig,

    /// Monitoring and logging
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on the anchor fetch for one request, in milliseconds
    #[serde(default = "default_anchor_timeout_ms")]
    pub anchor_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Path to keypair file
    #[serde(default)]
    pub keypair_path: Option<String>,

    /// Name of an environment variable holding a base58 secret
    #[serde(default = "default_secret_env")]
    pub secret_env: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Expose `/metrics`
    #[serde(default = "default_true")]
    pub enable_metrics: bool,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub json_logs: bool,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_anchor_timeout_ms() -> u64 { 5000 }
fn default_secret_env() -> Option<String> { Some("FEE_PAYER_SECRET".to_string()) }
fn default_true() -> bool { true }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            anchor_timeout_ms: default_anchor_timeout_ms(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            keypair_path: None,
            secret_env: default_secret_env(),
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enable_metrics: default_true(),
            json_logs: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            rpc: RpcManagerConfig::default(),
            wallet: WalletConfig::default(),
            monitoring: MonitoringConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        Self::from_toml(&content)
    }

    /// Load configuration with `.env` applied first
    pub fn from_file_with_env(path: &str) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_file(path)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.rpc.validate()?;
        if self.server.anchor_timeout_ms == 0 {
            bail!("server.anchor_timeout_ms must be greater than zero");
        }
        if self.wallet.keypair_path.is_none() && self.wallet.secret_env.is_none() {
            bail!("wallet.keypair_path or wallet.secret_env must be set");
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.rpc.commitment, "confirmed");
        assert_eq!(config.wallet.secret_env.as_deref(), Some("FEE_PAYER_SECRET"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 9000

            [rpc]
            endpoints = ["https://rpc-a.example", "https://rpc-b.example"]
            commitment = "finalized"

            [wallet]
            keypair_path = "/etc/fractions/payer.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.rpc.endpoints.len(), 2);
        assert_eq!(config.rpc.timeout_ms, 5000);
        assert_eq!(
            config.wallet.keypair_path.as_deref(),
            Some("/etc/fractions/payer.json")
        );
        assert!(config.monitoring.enable_metrics);
    }

    fn rejection(content: &str) -> String {
        format!("{:#}", Config::from_toml(content).unwrap_err())
    }

    #[test]
    fn test_rpc_only_file_loads_with_wallet_defaults() {
        let config = Config::from_toml("[rpc]\nendpoints = [\"https://a.example\"]\n").unwrap();
        assert_eq!(config.wallet.secret_env.as_deref(), Some("FEE_PAYER_SECRET"));
        assert!(config.wallet.keypair_path.is_none());
        assert_eq!(config.wallet.secret_env, Config::default().wallet.secret_env);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(rejection("[rpc]\nendpoints = []\n").contains("at least one RPC endpoint"));
        assert!(rejection(
            "[rpc]\nendpoints = [\"https://a.example\"]\ncommitment = \"soon\"\n"
        )
        .contains("unknown commitment level"));
        assert!(rejection("[server]\nanchor_timeout_ms = 0\n").contains("anchor_timeout_ms"));
    }

    #[test]
    fn test_wallet_without_any_source_rejected() {
        let mut config = Config::default();
        config.wallet.secret_env = None;
        let err = format!("{:#}", config.validate().unwrap_err());
        assert!(err.contains("wallet.keypair_path or wallet.secret_env"), "{err}");
    }
}
