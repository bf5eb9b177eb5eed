//! Transaction assembly
//!
//! Fetch anchor → compile v0 message → sign server-held slots → output.
//! A single linear pass: no retry and no state kept between calls. The
//! signer plan is consumed, so the ephemeral asset identity is dropped as
//! soon as its signature is in place.

use crate::compat;
use crate::rpc_manager::AnchorSource;
use crate::tx_builder::{
    errors::TransactionBuilderError, output::TxBuildOutput, signers::SignerPlan,
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    instruction::Instruction,
    message::{v0, VersionedMessage},
    signature::{Signature, Signer},
    transaction::VersionedTransaction,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct TxAssembler {
    anchors: Arc<dyn AnchorSource>,
    commitment: CommitmentConfig,
    anchor_timeout: Duration,
}

impl TxAssembler {
    pub fn new(
        anchors: Arc<dyn AnchorSource>,
        commitment: CommitmentConfig,
        anchor_timeout: Duration,
    ) -> Self {
        Self {
            anchors,
            commitment,
            anchor_timeout,
        }
    }

    /// Fetch a fresh checkpoint anchor, bounded by the configured timeout
    pub async fn fetch_anchor(&self) -> Result<Hash, TransactionBuilderError> {
        let anchor = match tokio::time::timeout(
            self.anchor_timeout,
            self.anchors.latest_anchor(self.commitment),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    timeout_ms = self.anchor_timeout.as_millis() as u64,
                    "Anchor fetch timed out"
                );
                return Err(TransactionBuilderError::AnchorTimeout {
                    timeout_ms: self.anchor_timeout.as_millis() as u64,
                });
            }
        };

        if anchor == Hash::default() {
            return Err(TransactionBuilderError::anchor_unavailable(
                "network returned the default anchor",
            ));
        }
        Ok(anchor)
    }

    /// Assemble and partially sign a bundle for `instructions`
    pub async fn assemble(
        &self,
        signers: SignerPlan<'_>,
        instructions: &[Instruction],
    ) -> Result<TxBuildOutput, TransactionBuilderError> {
        let anchor = self.fetch_anchor().await?;
        compile_and_sign(signers, instructions, anchor)
    }
}

/// Compile the bundle against `anchor` and fill every server-held slot
pub fn compile_and_sign(
    signers: SignerPlan<'_>,
    instructions: &[Instruction],
    anchor: Hash,
) -> Result<TxBuildOutput, TransactionBuilderError> {
    if instructions.is_empty() {
        return Err(TransactionBuilderError::internal("no instructions to assemble"));
    }

    let payer = signers.payer();
    let message = v0::Message::try_compile(&payer, instructions, &[], anchor)
        .map_err(|e| TransactionBuilderError::Signing(format!("message compile failed: {}", e)))?;
    let message = VersionedMessage::V0(message);

    let required = compat::get_required_signers(&message);
    if required.first() != Some(&payer) {
        return Err(TransactionBuilderError::internal("fee payer is not the first signer"));
    }
    for slot in signers.slots() {
        if !required.contains(&slot.pubkey) {
            return Err(TransactionBuilderError::internal(format!(
                "{:?} {} is not a required signer",
                slot.role, slot.pubkey
            )));
        }
    }
    if required.len() != signers.slots().len() {
        return Err(TransactionBuilderError::internal(format!(
            "message requires {} signatures, plan has {}",
            required.len(),
            signers.slots().len()
        )));
    }

    let message_bytes = message.serialize();
    let mut signatures = vec![Signature::default(); required.len()];

    for keypair in signers.server_keypairs() {
        let pubkey = keypair.pubkey();
        let index = required
            .iter()
            .position(|key| *key == pubkey)
            .ok_or_else(|| TransactionBuilderError::internal("server signer missing from message"))?;

        let signature = keypair
            .try_sign_message(&message_bytes)
            .map_err(|e| TransactionBuilderError::Signing(e.to_string()))?;
        if !signature.verify(pubkey.as_ref(), &message_bytes) {
            return Err(TransactionBuilderError::Signing(format!(
                "signature for {} failed verification",
                pubkey
            )));
        }
        signatures[index] = signature;
    }

    debug!(
        payer = %payer,
        asset_identity = %signers.asset_identity(),
        pending = signers.wallet_signers().len(),
        anchor = %anchor,
        "Bundle partially signed"
    );

    // Ephemeral identity is dropped here.
    drop(signers);

    Ok(TxBuildOutput::new(
        VersionedTransaction {
            signatures,
            message,
        },
        anchor,
    ))
}
