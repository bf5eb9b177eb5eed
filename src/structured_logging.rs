//! Structured logging for the purchase pipeline
//!
//! One `PurchaseLogger` per request, carrying the correlation id so every
//! line of a request can be joined. Only public keys are ever logged.

use crate::observability::CorrelationId;
use crate::tx_builder::{PurchaseOrder, TransactionBuilderError};
use solana_sdk::{hash::Hash, pubkey::Pubkey};

/// Structured logger for pipeline events
#[derive(Debug, Clone)]
pub struct PurchaseLogger {
    correlation_id: CorrelationId,
}

impl PurchaseLogger {
    pub fn new(correlation_id: CorrelationId) -> Self {
        Self { correlation_id }
    }

    pub fn log_request(&self, order: &PurchaseOrder) {
        tracing::info!(
            correlation_id = %self.correlation_id,
            listing_id = order.listing_id,
            buyer = %order.buyer,
            reference = %order.reference,
            amount = order.amount,
            "Purchase request received"
        );
    }

    pub fn log_accounts_resolved(&self, listing: &Pubkey, object: &Pubkey, fraction: &Pubkey) {
        tracing::debug!(
            correlation_id = %self.correlation_id,
            listing = %listing,
            object = %object,
            fraction = %fraction,
            "Accounts resolved"
        );
    }

    pub fn log_success(&self, anchor: &Hash, pending_signers: usize, latency_ms: u64) {
        tracing::info!(
            correlation_id = %self.correlation_id,
            anchor = %anchor,
            pending_signers,
            latency_ms,
            "Purchase bundle assembled"
        );
    }

    pub fn log_failure(&self, error: &TransactionBuilderError, latency_ms: u64) {
        let kind = error.kind().as_str();
        match error.kind() {
            crate::tx_builder::ErrorKind::ClientInput => tracing::info!(
                correlation_id = %self.correlation_id,
                kind,
                code = error.code(),
                error = %error,
                latency_ms,
                "Purchase request rejected"
            ),
            crate::tx_builder::ErrorKind::Retryable => tracing::warn!(
                correlation_id = %self.correlation_id,
                kind,
                code = error.code(),
                error = %error,
                latency_ms,
                "Purchase request failed, retryable"
            ),
            _ => tracing::error!(
                correlation_id = %self.correlation_id,
                kind,
                code = error.code(),
                error = %error,
                latency_ms,
                "Purchase request failed"
            ),
        }
    }
}
