//! Instruction building for `buy_fraction`
//!
//! Resolves every account the program declares, feeds them through the
//! typed binding, and checks the result against the IDL table before it is
//! handed to the assembler. No on-chain validation happens here: price,
//! quota and activation checks only run when the program executes.

use crate::tx_builder::{
    addresses::{
        AddressResolver, ASSOCIATED_TOKEN_PROGRAM_ID, CURRENCY_MINT, SYSTEM_PROGRAM_ID,
        TOKEN_PROGRAM_ID,
    },
    context::PurchaseOrder,
    errors::TransactionBuilderError,
    program::{self, BuyFractionAccounts, BuyFractionArgs, BUY_FRACTION_ACCOUNTS},
    signers::SignerPlan,
};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct InstructionBuilder {
    resolver: AddressResolver,
    currency_mint: Pubkey,
}

impl Default for InstructionBuilder {
    fn default() -> Self {
        Self::new(AddressResolver::default(), CURRENCY_MINT)
    }
}

impl InstructionBuilder {
    pub fn new(resolver: AddressResolver, currency_mint: Pubkey) -> Self {
        Self {
            resolver,
            currency_mint,
        }
    }

    pub fn resolver(&self) -> &AddressResolver {
        &self.resolver
    }

    /// Resolve the full account set for one purchase
    pub fn resolve_accounts(
        &self,
        order: &PurchaseOrder,
        signers: &SignerPlan<'_>,
    ) -> Result<BuyFractionAccounts, TransactionBuilderError> {
        let listing = self.resolver.listing(order.listing_id)?;
        let buyer = signers.buyer();

        let accounts = BuyFractionAccounts {
            manager: self.resolver.manager()?,
            protocol: self.resolver.protocol()?,
            listing,
            object: self.resolver.object(&order.reference)?,
            fraction: signers.asset_identity(),
            buyer_profile: self.resolver.buyer_profile(&buyer)?,
            buyer_currency: self.resolver.currency_account(
                "buyer_currency",
                &buyer,
                &self.currency_mint,
            )?,
            listing_currency: self.resolver.currency_account(
                "listing_currency",
                &listing,
                &self.currency_mint,
            )?,
            currency_mint: self.currency_mint,
            buyer,
            payer: signers.payer(),
            token_program: TOKEN_PROGRAM_ID,
            associated_token_program: ASSOCIATED_TOKEN_PROGRAM_ID,
            system_program: SYSTEM_PROGRAM_ID,
        };

        #[cfg(feature = "trace-accounts")]
        for (meta, declared) in accounts
            .to_account_metas()
            .iter()
            .zip(BUY_FRACTION_ACCOUNTS.iter())
        {
            debug!(account = declared.name, pubkey = %meta.pubkey, "Resolved account");
        }

        Ok(accounts)
    }

    /// Build the single `buy_fraction` instruction for this order
    pub fn build(
        &self,
        order: &PurchaseOrder,
        signers: &SignerPlan<'_>,
    ) -> Result<Instruction, TransactionBuilderError> {
        let accounts = self.resolve_accounts(order, signers)?;
        self.build_with_accounts(order, accounts)
    }

    /// Build from an already resolved account set
    pub fn build_with_accounts(
        &self,
        order: &PurchaseOrder,
        accounts: BuyFractionAccounts,
    ) -> Result<Instruction, TransactionBuilderError> {
        let args = BuyFractionArgs {
            uri: order.uri.clone(),
        };
        let ix = program::buy_fraction(self.resolver.program_id(), &accounts, &args)?;

        check_account_layout(&ix)?;

        debug!(
            listing_id = order.listing_id,
            listing = %accounts.listing,
            fraction = %accounts.fraction,
            accounts = ix.accounts.len(),
            "buy_fraction instruction built"
        );
        Ok(ix)
    }
}

/// Verify an instruction's account list against the declared IDL layout
///
/// Checks count, writable/signer flags per position, and that the last
/// account is the system program.
pub fn check_account_layout(ix: &Instruction) -> Result<(), TransactionBuilderError> {
    if ix.accounts.len() != BUY_FRACTION_ACCOUNTS.len() {
        return Err(TransactionBuilderError::instruction_failed(
            ix.program_id.to_string(),
            format!(
                "expected {} accounts, got {}",
                BUY_FRACTION_ACCOUNTS.len(),
                ix.accounts.len()
            ),
        ));
    }

    for (index, (meta, declared)) in ix
        .accounts
        .iter()
        .zip(BUY_FRACTION_ACCOUNTS.iter())
        .enumerate()
    {
        if meta.is_writable != declared.writable || meta.is_signer != declared.signer {
            return Err(TransactionBuilderError::instruction_failed(
                ix.program_id.to_string(),
                format!(
                    "account {} ({}) flags mismatch: writable={} signer={}",
                    index, declared.name, meta.is_writable, meta.is_signer
                ),
            ));
        }
    }

    match ix.accounts.last() {
        Some(last) if last.pubkey == SYSTEM_PROGRAM_ID => Ok(()),
        _ => Err(TransactionBuilderError::instruction_failed(
            ix.program_id.to_string(),
            "last account must be the system program",
        )),
    }
}
