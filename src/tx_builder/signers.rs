//! Signer composition for the purchase bundle
//!
//! Three identities sign a purchase:
//! - the fee payer, a persistent server key that pays network fees
//! - a fresh asset identity that authorizes creation of its own fraction
//!   record and is dropped when the request ends
//! - the buyer, whose slot is reserved for the caller's wallet
//!
//! The first two sign here, the buyer signs client-side.

use crate::tx_builder::errors::TransactionBuilderError;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use std::fmt;
use tracing::debug;

/// One-time key pair for a single fraction record.
///
/// Not `Clone`, not serializable, and its `Debug` shows only the public key.
pub struct EphemeralIdentity {
    inner: Keypair,
}

impl EphemeralIdentity {
    /// Generate from the OS CSPRNG
    pub fn generate() -> Self {
        Self {
            inner: Keypair::new(),
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.inner.pubkey()
    }

    pub(crate) fn keypair(&self) -> &Keypair {
        &self.inner
    }
}

impl fmt::Debug for EphemeralIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EphemeralIdentity")
            .field(&self.inner.pubkey())
            .finish()
    }
}

impl Drop for EphemeralIdentity {
    fn drop(&mut self) {
        debug!(
            pubkey = %self.inner.pubkey(),
            operation = "discard",
            "Ephemeral asset identity dropped"
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerRole {
    FeePayer,
    AssetIdentity,
    Buyer,
}

/// Who fills a signature slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Custody {
    /// Key held here, signed before the bundle leaves the service
    Server,
    /// Left empty for the caller's wallet
    Wallet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignerSlot {
    pub pubkey: Pubkey,
    pub role: SignerRole,
    pub custody: Custody,
}

/// Hands out per-request signer plans around the shared fee payer
#[derive(Clone, Copy)]
pub struct SignerCoordinator<'a> {
    fee_payer: &'a Keypair,
}

impl<'a> SignerCoordinator<'a> {
    pub fn new(fee_payer: &'a Keypair) -> Self {
        Self { fee_payer }
    }

    pub fn fee_payer(&self) -> Pubkey {
        self.fee_payer.pubkey()
    }

    /// Plan signers for one purchase with a freshly generated asset identity
    pub fn plan(&self, buyer: Pubkey) -> Result<SignerPlan<'a>, TransactionBuilderError> {
        SignerPlan::new(self.fee_payer, buyer, EphemeralIdentity::generate())
    }
}

/// Signers of one purchase bundle
pub struct SignerPlan<'a> {
    fee_payer: &'a Keypair,
    asset_identity: EphemeralIdentity,
    buyer: Pubkey,
}

impl<'a> SignerPlan<'a> {
    pub fn new(
        fee_payer: &'a Keypair,
        buyer: Pubkey,
        asset_identity: EphemeralIdentity,
    ) -> Result<Self, TransactionBuilderError> {
        if buyer == fee_payer.pubkey() {
            return Err(TransactionBuilderError::BuyerIsFeePayer(buyer.to_string()));
        }
        if buyer == asset_identity.pubkey() {
            return Err(TransactionBuilderError::internal(
                "asset identity collides with buyer",
            ));
        }

        Ok(Self {
            fee_payer,
            asset_identity,
            buyer,
        })
    }

    pub fn payer(&self) -> Pubkey {
        self.fee_payer.pubkey()
    }

    pub fn asset_identity(&self) -> Pubkey {
        self.asset_identity.pubkey()
    }

    pub fn buyer(&self) -> Pubkey {
        self.buyer
    }

    /// All signing identities; the fee payer comes first
    pub fn slots(&self) -> [SignerSlot; 3] {
        [
            SignerSlot {
                pubkey: self.payer(),
                role: SignerRole::FeePayer,
                custody: Custody::Server,
            },
            SignerSlot {
                pubkey: self.asset_identity(),
                role: SignerRole::AssetIdentity,
                custody: Custody::Server,
            },
            SignerSlot {
                pubkey: self.buyer,
                role: SignerRole::Buyer,
                custody: Custody::Wallet,
            },
        ]
    }

    /// Key pairs for every slot in server custody
    pub(crate) fn server_keypairs(&self) -> [&Keypair; 2] {
        [self.fee_payer, self.asset_identity.keypair()]
    }

    /// Public keys of slots left for the wallet
    pub fn wallet_signers(&self) -> Vec<Pubkey> {
        self.slots()
            .iter()
            .filter(|slot| slot.custody == Custody::Wallet)
            .map(|slot| slot.pubkey)
            .collect()
    }
}

impl fmt::Debug for SignerPlan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerPlan")
            .field("payer", &self.payer())
            .field("asset_identity", &self.asset_identity())
            .field("buyer", &self.buyer)
            .finish()
    }
}
