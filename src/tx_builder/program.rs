//! Typed binding for the fractions program's `buy_fraction` method
//!
//! Mirrors the published IDL: one struct field per declared account, a
//! descriptor table with the declared order and flags, and Anchor-style
//! instruction data (8-byte method discriminator + borsh arguments).

use crate::tx_builder::errors::TransactionBuilderError;
use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

pub const BUY_FRACTION: &str = "buy_fraction";

/// One account entry from the IDL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdlAccount {
    pub name: &'static str,
    pub writable: bool,
    pub signer: bool,
}

const fn idl(name: &'static str, writable: bool, signer: bool) -> IdlAccount {
    IdlAccount {
        name,
        writable,
        signer,
    }
}

/// Declared accounts of `buy_fraction`, in program order
pub const BUY_FRACTION_ACCOUNTS: [IdlAccount; 14] = [
    idl("manager", false, false),
    idl("protocol", true, false),
    idl("listing", true, false),
    idl("object", false, false),
    idl("fraction", true, true),
    idl("buyer_profile", true, false),
    idl("buyer_currency", true, false),
    idl("listing_currency", true, false),
    idl("currency_mint", false, false),
    idl("buyer", true, true),
    idl("payer", true, true),
    idl("token_program", false, false),
    idl("associated_token_program", false, false),
    idl("system_program", false, false),
];

/// `sha256("global:<method>")[..8]`
pub fn anchor_discriminator(method: &str) -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(b"global:");
    hasher.update(method.as_bytes());
    let hash = hasher.finalize();
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash[..8]);
    out
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct BuyFractionArgs {
    pub uri: String,
}

/// Accounts of `buy_fraction`.
///
/// Field order is irrelevant; [`BuyFractionAccounts::to_account_metas`] is
/// the single place that fixes the wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyFractionAccounts {
    pub manager: Pubkey,
    pub protocol: Pubkey,
    pub listing: Pubkey,
    pub object: Pubkey,
    pub fraction: Pubkey,
    pub buyer_profile: Pubkey,
    pub buyer_currency: Pubkey,
    pub listing_currency: Pubkey,
    pub currency_mint: Pubkey,
    pub buyer: Pubkey,
    pub payer: Pubkey,
    pub token_program: Pubkey,
    pub associated_token_program: Pubkey,
    pub system_program: Pubkey,
}

impl BuyFractionAccounts {
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new_readonly(self.manager, false),
            AccountMeta::new(self.protocol, false),
            AccountMeta::new(self.listing, false),
            AccountMeta::new_readonly(self.object, false),
            AccountMeta::new(self.fraction, true),
            AccountMeta::new(self.buyer_profile, false),
            AccountMeta::new(self.buyer_currency, false),
            AccountMeta::new(self.listing_currency, false),
            AccountMeta::new_readonly(self.currency_mint, false),
            AccountMeta::new(self.buyer, true),
            AccountMeta::new(self.payer, true),
            AccountMeta::new_readonly(self.token_program, false),
            AccountMeta::new_readonly(self.associated_token_program, false),
            AccountMeta::new_readonly(self.system_program, false),
        ]
    }
}

/// Build the `buy_fraction` instruction
pub fn buy_fraction(
    program_id: &Pubkey,
    accounts: &BuyFractionAccounts,
    args: &BuyFractionArgs,
) -> Result<Instruction, TransactionBuilderError> {
    let mut data = anchor_discriminator(BUY_FRACTION).to_vec();
    let encoded = borsh::to_vec(args).map_err(|e| {
        TransactionBuilderError::instruction_failed(
            program_id.to_string(),
            format!("borsh encode failed: {e}"),
        )
    })?;
    data.extend_from_slice(&encoded);

    Ok(Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(),
        data,
    })
}

/// Decode `buy_fraction` instruction data back into its arguments
pub fn decode_buy_fraction_args(data: &[u8]) -> Result<BuyFractionArgs, TransactionBuilderError> {
    if data.len() < 8 || data[..8] != anchor_discriminator(BUY_FRACTION) {
        return Err(TransactionBuilderError::Encoding(
            "not a buy_fraction instruction".to_string(),
        ));
    }
    borsh::from_slice(&data[8..])
        .map_err(|e| TransactionBuilderError::Encoding(format!("borsh decode failed: {e}")))
}
