//! Wire types for the HTTP surface

use crate::tx_builder::TransactionBuilderError;
use serde::{Deserialize, Serialize};

/// Body of `POST /protocol/buy`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyRequest {
    /// Listing id
    pub id: u64,

    /// Metadata URI for the new fraction record
    pub uri: String,

    /// Object reference string
    pub reference: String,

    /// Buyer's base58 public key
    pub public_key: String,

    /// Requested fraction count
    #[serde(default = "default_amount")]
    pub amount: u64,
}

fn default_amount() -> u64 {
    1
}

/// Successful purchase response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyResponse {
    /// Partially signed bundle, base64 over the wire format
    pub transaction: String,
}

/// Error envelope returned with every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(kind: &str, code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                kind: kind.to_string(),
                code: code.to_string(),
                message: message.into(),
            },
        }
    }
}

impl From<&TransactionBuilderError> for ErrorResponse {
    fn from(err: &TransactionBuilderError) -> Self {
        Self::new(err.kind().as_str(), err.code(), err.to_string())
    }
}

/// Liveness response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub fee_payer: String,
}
