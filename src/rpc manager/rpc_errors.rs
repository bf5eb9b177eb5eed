use crate::tx_builder::TransactionBuilderError;
use solana_client::client_error::ClientError;
use thiserror::Error;

/// Network client error types
#[derive(Debug, Clone, Error)]
pub enum RpcManagerError {
    /// Transport-level errors (network, connection)
    #[error("Transport error: {message} (endpoint: {endpoint})")]
    Transport { endpoint: String, message: String },

    /// Timeout errors
    #[error("Timeout after {timeout_ms}ms (endpoint: {endpoint})")]
    Timeout { endpoint: String, timeout_ms: u64 },

    /// RPC response errors (from the RPC server)
    #[error("RPC response error: {message} (endpoint: {endpoint}, code: {code:?})")]
    RpcResponse {
        endpoint: String,
        message: String,
        code: Option<i64>,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded (endpoint: {endpoint})")]
    RateLimitExceeded { endpoint: String },

    /// No endpoint is currently usable
    #[error("No healthy endpoints available (total: {total}, cooling down: {cooling_down})")]
    NoHealthyEndpoints { total: usize, cooling_down: usize },

    /// Too many anchor fetches in flight
    #[error("Overloaded ({active} requests in flight)")]
    Overloaded { active: u64 },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RpcManagerError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            RpcManagerError::Transport { .. } => true,
            RpcManagerError::Timeout { .. } => true,
            RpcManagerError::RateLimitExceeded { .. } => true,
            RpcManagerError::NoHealthyEndpoints { .. } => true,
            RpcManagerError::Overloaded { .. } => true,
            RpcManagerError::Configuration(_) => false,

            // Retry on server errors (5xx) and JSON-RPC server errors
            RpcManagerError::RpcResponse { code, .. } => match code {
                Some(c) => (500..600).contains(c) || (-32099..=-32000).contains(c),
                None => true,
            },
        }
    }

    /// Get the endpoint associated with this error, if any
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            RpcManagerError::Transport { endpoint, .. } => Some(endpoint),
            RpcManagerError::Timeout { endpoint, .. } => Some(endpoint),
            RpcManagerError::RpcResponse { endpoint, .. } => Some(endpoint),
            RpcManagerError::RateLimitExceeded { endpoint } => Some(endpoint),
            _ => None,
        }
    }

    /// Create from ClientError with context
    pub fn from_client_error(err: ClientError, endpoint: &str) -> Self {
        let err_str = err.to_string().to_lowercase();

        if err_str.contains("rate limit")
            || err_str.contains("too many requests")
            || err_str.contains("429")
        {
            RpcManagerError::RateLimitExceeded {
                endpoint: endpoint.to_string(),
            }
        } else if err_str.contains("error sending request")
            || err_str.contains("connection refused")
            || err_str.contains("dns error")
        {
            RpcManagerError::Transport {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            }
        } else {
            let code = err_str
                .split("code:")
                .nth(1)
                .and_then(|s| s.split_whitespace().next())
                .and_then(|s| s.trim_end_matches(',').parse::<i64>().ok());

            RpcManagerError::RpcResponse {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
                code,
            }
        }
    }
}

impl From<RpcManagerError> for TransactionBuilderError {
    fn from(err: RpcManagerError) -> Self {
        match err {
            RpcManagerError::Configuration(msg) => TransactionBuilderError::Configuration(msg),
            RpcManagerError::Timeout { timeout_ms, .. } => {
                TransactionBuilderError::AnchorTimeout { timeout_ms }
            }
            other => TransactionBuilderError::anchor_unavailable(other.to_string()),
        }
    }
}
