use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;

use super::RpcManagerError;

/// Network client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcManagerConfig {
    /// RPC endpoint URLs, used round-robin
    pub endpoints: Vec<String>,

    /// Commitment used when fetching the checkpoint anchor
    #[serde(default = "default_commitment")]
    pub commitment: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Consecutive failures before an endpoint is cooled down
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u64,

    /// Cooldown period in seconds
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// Maximum in-flight anchor fetches across the pool
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: u64,
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_failure_threshold() -> u64 {
    3
}

fn default_cooldown_secs() -> u64 {
    30
}

fn default_max_concurrent_requests() -> u64 {
    1000
}

impl Default for RpcManagerConfig {
    fn default() -> Self {
        Self {
            endpoints: vec!["https://api.mainnet-beta.solana.com".to_string()],
            commitment: default_commitment(),
            timeout_ms: default_timeout_ms(),
            failure_threshold: default_failure_threshold(),
            cooldown_secs: default_cooldown_secs(),
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

impl RpcManagerConfig {
    /// Parse the configured commitment level
    pub fn commitment_config(&self) -> Result<CommitmentConfig, RpcManagerError> {
        parse_commitment(&self.commitment)
    }

    pub fn validate(&self) -> Result<(), RpcManagerError> {
        if self.endpoints.is_empty() {
            return Err(RpcManagerError::Configuration(
                "at least one RPC endpoint is required".to_string(),
            ));
        }
        if let Some(bad) = self
            .endpoints
            .iter()
            .find(|url| !(url.starts_with("http://") || url.starts_with("https://")))
        {
            return Err(RpcManagerError::Configuration(format!(
                "endpoint must be an http(s) URL: {}",
                bad
            )));
        }
        if self.timeout_ms == 0 {
            return Err(RpcManagerError::Configuration(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.max_concurrent_requests == 0 {
            return Err(RpcManagerError::Configuration(
                "max_concurrent_requests must be greater than zero".to_string(),
            ));
        }
        self.commitment_config().map(|_| ())
    }
}

pub fn parse_commitment(value: &str) -> Result<CommitmentConfig, RpcManagerError> {
    match value {
        "processed" => Ok(CommitmentConfig::processed()),
        "confirmed" => Ok(CommitmentConfig::confirmed()),
        "finalized" => Ok(CommitmentConfig::finalized()),
        other => Err(RpcManagerError::Configuration(format!(
            "unknown commitment level: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(RpcManagerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_commitment_parsing() {
        assert_eq!(
            parse_commitment("finalized").unwrap(),
            CommitmentConfig::finalized()
        );
        assert!(parse_commitment("max").is_err());
    }

    #[test]
    fn test_validation_failures() {
        let mut config = RpcManagerConfig::default();
        config.endpoints.clear();
        assert!(config.validate().is_err());

        let mut config = RpcManagerConfig::default();
        config.endpoints = vec!["ws://localhost:8900".to_string()];
        assert!(config.validate().is_err());

        let mut config = RpcManagerConfig::default();
        config.timeout_ms = 0;
        assert!(config.validate().is_err());
    }
}
