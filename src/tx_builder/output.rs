//! Partially signed transaction output
//!
//! Holds the assembled bundle after server-side signing and produces the
//! transport form: bincode wire bytes, base64 encoded for JSON embedding.
//! The wallet slots are still empty; the caller's wallet completes them.

use crate::compat;
use crate::tx_builder::errors::TransactionBuilderError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use solana_sdk::{
    hash::Hash, pubkey::Pubkey, signature::Signature, transaction::VersionedTransaction,
};

#[derive(Debug, Clone)]
pub struct TxBuildOutput {
    /// The partially signed bundle
    pub tx: VersionedTransaction,

    /// Checkpoint anchor the bundle was compiled against
    pub anchor: Hash,

    /// Every required signer, in slot order
    pub required_signers: Vec<Pubkey>,

    /// Required signers left for the caller's wallet
    pub pending_signers: Vec<Pubkey>,
}

impl TxBuildOutput {
    pub fn new(tx: VersionedTransaction, anchor: Hash) -> Self {
        let required_signers = compat::get_required_signers(&tx.message).to_vec();
        let pending_signers = compat::get_unsigned_signers(&tx);

        Self {
            tx,
            anchor,
            required_signers,
            pending_signers,
        }
    }

    pub fn payer(&self) -> Option<Pubkey> {
        compat::get_fee_payer(&self.tx.message).copied()
    }

    /// Whether `signer`'s slot holds a signature
    pub fn is_signed_by(&self, signer: &Pubkey) -> bool {
        compat::get_signature_for(&self.tx, signer)
            .map_or(false, |sig| *sig != Signature::default())
    }

    /// Wire bytes of the bundle
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransactionBuilderError> {
        bincode::serialize(&self.tx).map_err(|e| {
            TransactionBuilderError::Encoding(format!("failed to serialize transaction: {}", e))
        })
    }

    /// Base64 transport encoding
    pub fn to_base64(&self) -> Result<String, TransactionBuilderError> {
        Ok(BASE64.encode(self.to_bytes()?))
    }
}

/// Decode the base64 transport form back into a transaction
pub fn decode_base64(encoded: &str) -> Result<VersionedTransaction, TransactionBuilderError> {
    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| TransactionBuilderError::Encoding(format!("invalid base64: {}", e)))?;
    bincode::deserialize(&bytes)
        .map_err(|e| TransactionBuilderError::Encoding(format!("invalid transaction bytes: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::{
        instruction::{AccountMeta, Instruction},
        message::{v0, VersionedMessage},
        signature::{Keypair, Signer},
    };

    fn partially_signed() -> (TxBuildOutput, Keypair, Pubkey) {
        let payer = Keypair::new();
        let wallet = Pubkey::new_unique();
        let ix = Instruction::new_with_bytes(
            Pubkey::new_unique(),
            &[1, 2, 3],
            vec![AccountMeta::new(wallet, true)],
        );
        let anchor = Hash::new_unique();
        let message = VersionedMessage::V0(
            v0::Message::try_compile(&payer.pubkey(), &[ix], &[], anchor).unwrap(),
        );
        let mut tx = VersionedTransaction {
            signatures: vec![Signature::default(); 2],
            message,
        };
        tx.signatures[0] = payer.sign_message(&tx.message.serialize());
        (TxBuildOutput::new(tx, anchor), payer, wallet)
    }

    #[test]
    fn test_pending_signers() {
        let (output, payer, wallet) = partially_signed();
        assert_eq!(output.required_signers, vec![payer.pubkey(), wallet]);
        assert_eq!(output.pending_signers, vec![wallet]);
        assert!(output.is_signed_by(&payer.pubkey()));
        assert!(!output.is_signed_by(&wallet));
        assert_eq!(output.payer(), Some(payer.pubkey()));
    }

    #[test]
    fn test_base64_decodes_to_same_transaction() {
        let (output, _, _) = partially_signed();
        let decoded = decode_base64(&output.to_base64().unwrap()).unwrap();
        assert_eq!(decoded, output.tx);
        assert_eq!(*decoded.message.recent_blockhash(), output.anchor);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_base64("not base64!").is_err());
        assert!(decode_base64(&BASE64.encode([1u8, 2, 3])).is_err());
    }
}
