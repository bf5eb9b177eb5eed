//! Compatibility layer for Solana SDK message types
//!
//! Uniform accessors over `VersionedMessage` (Legacy and V0) used by the
//! assembler, the output type, and tests that inspect decoded bundles.
//!
//! Only static account keys are considered. Bundles built here never use
//! address lookup tables.

use solana_sdk::{
    instruction::AccountMeta,
    message::{MessageHeader, VersionedMessage},
    pubkey::Pubkey,
    signature::Signature,
    transaction::VersionedTransaction,
};

#[inline]
#[must_use]
pub fn get_message_header(message: &VersionedMessage) -> &MessageHeader {
    match message {
        VersionedMessage::Legacy(legacy_msg) => &legacy_msg.header,
        VersionedMessage::V0(v0_msg) => &v0_msg.header,
    }
}

#[inline]
#[must_use]
pub fn get_static_account_keys(message: &VersionedMessage) -> &[Pubkey] {
    match message {
        VersionedMessage::Legacy(legacy_msg) => &legacy_msg.account_keys,
        VersionedMessage::V0(v0_msg) => &v0_msg.account_keys,
    }
}

/// Accounts that must sign, in signature-slot order.
///
/// The first entry is always the fee payer.
#[inline]
#[must_use]
pub fn get_required_signers(message: &VersionedMessage) -> &[Pubkey] {
    let header = get_message_header(message);
    let keys = get_static_account_keys(message);
    let n = (header.num_required_signatures as usize).min(keys.len());
    &keys[..n]
}

#[inline]
#[must_use]
pub fn get_fee_payer(message: &VersionedMessage) -> Option<&Pubkey> {
    get_static_account_keys(message).first()
}

/// Writability of a static account key, as encoded in the header
pub fn is_writable_index(message: &VersionedMessage, index: usize) -> bool {
    let header = get_message_header(message);
    let total = get_static_account_keys(message).len();
    let signed = header.num_required_signatures as usize;

    if index >= total {
        return false;
    }
    if index < signed {
        index < signed.saturating_sub(header.num_readonly_signed_accounts as usize)
    } else {
        index < total.saturating_sub(header.num_readonly_unsigned_accounts as usize)
    }
}

/// Signature slot for `signer`, if it is a required signer
pub fn get_signature_for<'a>(
    tx: &'a VersionedTransaction,
    signer: &Pubkey,
) -> Option<&'a Signature> {
    get_required_signers(&tx.message)
        .iter()
        .position(|key| key == signer)
        .and_then(|index| tx.signatures.get(index))
}

/// Required signers whose slot still holds the empty signature
pub fn get_unsigned_signers(tx: &VersionedTransaction) -> Vec<Pubkey> {
    get_required_signers(&tx.message)
        .iter()
        .enumerate()
        .filter(|(index, _)| {
            tx.signatures
                .get(*index)
                .map_or(true, |sig| *sig == Signature::default())
        })
        .map(|(_, key)| *key)
        .collect()
}

/// A compiled instruction expanded back to keys and flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInstruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// Expand every compiled instruction in the message.
///
/// Returns `None` if an index points outside the static keys.
pub fn decode_instructions(message: &VersionedMessage) -> Option<Vec<DecodedInstruction>> {
    let keys = get_static_account_keys(message);
    let signed = get_message_header(message).num_required_signatures as usize;

    message
        .instructions()
        .iter()
        .map(|compiled| {
            let program_id = *keys.get(compiled.program_id_index as usize)?;
            let accounts = compiled
                .accounts
                .iter()
                .map(|&index| {
                    let index = index as usize;
                    keys.get(index).map(|key| AccountMeta {
                        pubkey: *key,
                        is_signer: index < signed,
                        is_writable: is_writable_index(message, index),
                    })
                })
                .collect::<Option<Vec<_>>>()?;
            Some(DecodedInstruction {
                program_id,
                accounts,
                data: compiled.data.clone(),
            })
        })
        .collect()
}
