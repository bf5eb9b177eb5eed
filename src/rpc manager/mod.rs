//! RPC Manager Module
//!
//! Network client for the assembler: pooled endpoints serving checkpoint
//! anchors (recent blockhashes).

use async_trait::async_trait;
use solana_sdk::{commitment_config::CommitmentConfig, hash::Hash};

// Submodules
pub mod rpc_config;
pub mod rpc_errors;
pub mod rpc_pool;

// Re-exports for convenience
pub use rpc_config::{parse_commitment, RpcManagerConfig};
pub use rpc_errors::RpcManagerError;
pub use rpc_pool::RpcPool;

/// Source of checkpoint anchors
#[async_trait]
pub trait AnchorSource: Send + Sync + std::fmt::Debug {
    /// Fetch the latest anchor at the given commitment
    async fn latest_anchor(&self, commitment: CommitmentConfig) -> Result<Hash, RpcManagerError>;
}
