//! Shared fixtures for the purchase pipeline tests
//!
//! - Anchor sources that answer, fail, or never answer
//! - Leaked fee payers so each test gets its own `'static` key without
//!   touching the process-wide singleton
//! - A ready-made engine and order

use crate::buy_engine::BuyEngine;
use crate::rpc_manager::{AnchorSource, RpcManagerError};
use crate::tx_builder::{PurchaseOrder, TxAssembler};
use crate::types::BuyRequest;
use crate::wallet::FeePayer;
use async_trait::async_trait;
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Keypair,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const LISTING_ID: u64 = 10817;
pub const URI: &str = "ipfs://abc123";
pub const REFERENCE: &str = "25.766,-80.132";

/// Returns the same anchor on every call and counts calls
#[derive(Debug, Default)]
pub struct FixedAnchor {
    pub anchor: Hash,
    pub calls: AtomicU64,
}

impl FixedAnchor {
    pub fn new(anchor: Hash) -> Self {
        Self {
            anchor,
            calls: AtomicU64::new(0),
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnchorSource for FixedAnchor {
    async fn latest_anchor(&self, _: CommitmentConfig) -> Result<Hash, RpcManagerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.anchor)
    }
}

/// Every call fails with a transport error
#[derive(Debug)]
pub struct FailingAnchor;

#[async_trait]
impl AnchorSource for FailingAnchor {
    async fn latest_anchor(&self, _: CommitmentConfig) -> Result<Hash, RpcManagerError> {
        Err(RpcManagerError::Transport {
            endpoint: "http://mock.invalid".to_string(),
            message: "connection refused".to_string(),
        })
    }
}

/// Never answers
#[derive(Debug)]
pub struct HangingAnchor;

#[async_trait]
impl AnchorSource for HangingAnchor {
    async fn latest_anchor(&self, _: CommitmentConfig) -> Result<Hash, RpcManagerError> {
        std::future::pending().await
    }
}

pub fn leaked_fee_payer() -> &'static FeePayer {
    Box::leak(Box::new(FeePayer::from_keypair(Keypair::new())))
}

pub fn assembler(anchors: Arc<dyn AnchorSource>) -> TxAssembler {
    assembler_with_timeout(anchors, Duration::from_secs(5))
}

pub fn assembler_with_timeout(anchors: Arc<dyn AnchorSource>, timeout: Duration) -> TxAssembler {
    TxAssembler::new(anchors, CommitmentConfig::confirmed(), timeout)
}

pub fn engine(anchors: Arc<dyn AnchorSource>) -> BuyEngine {
    BuyEngine::new(leaked_fee_payer(), assembler(anchors))
}

pub fn order(buyer: Pubkey) -> PurchaseOrder {
    PurchaseOrder::new(LISTING_ID, URI, REFERENCE, buyer, 1)
}

pub fn request(buyer: &Pubkey) -> BuyRequest {
    BuyRequest {
        id: LISTING_ID,
        uri: URI.to_string(),
        reference: REFERENCE.to_string(),
        public_key: buyer.to_string(),
        amount: 1,
    }
}
