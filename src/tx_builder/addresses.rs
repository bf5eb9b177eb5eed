//! Program-derived address resolution
//!
//! Addresses owned by the fractions program are derived from an ordered seed
//! list plus the owning program id. The search walks a single trailing bump
//! byte from 255 downward and takes the first hash that is off the ed25519
//! curve, which is exactly what the on-chain program does when it checks the
//! account list. Any difference in seed order or width gives a different,
//! valid-looking address that the program will reject.
//!
//! Numeric seeds are always fixed-width little-endian.

use crate::tx_builder::errors::TransactionBuilderError;
use solana_sdk::{
    pubkey,
    pubkey::{Pubkey, PubkeyError, MAX_SEEDS, MAX_SEED_LEN},
    system_program,
};

/// The fractions program (target of `buy_fraction`)
pub const FRACTIONS_PROGRAM_ID: Pubkey = pubkey!("2ctuxiMXa3h9Rp87dSbFFPMQg5ecmKV2y3rMf9Ex2kHv");

/// Currency accepted by listings (USDC)
pub const CURRENCY_MINT: Pubkey = pubkey!("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");

pub const SYSTEM_PROGRAM_ID: Pubkey = system_program::ID;
pub const TOKEN_PROGRAM_ID: Pubkey = spl_token::ID;
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = spl_associated_token_account::ID;

pub const MANAGER_SEED: &[u8] = b"manager";
pub const PROTOCOL_SEED: &[u8] = b"protocol";
pub const LISTING_SEED: &[u8] = b"listing";
pub const OBJECT_SEED: &[u8] = b"object";
pub const BUYER_SEED: &[u8] = b"buyer";

/// Derive a program address, returning the address and its bump.
///
/// `account` only labels errors. Seeds longer than the ledger allows are
/// client-input errors; an exhausted bump search is a configuration error.
pub fn derive(
    account: &'static str,
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), TransactionBuilderError> {
    // The bump occupies one seed slot.
    if seeds.len() >= MAX_SEEDS {
        return Err(TransactionBuilderError::derivation(
            account,
            format!("{} seeds given, at most {} allowed", seeds.len(), MAX_SEEDS - 1),
        ));
    }
    if let Some((index, seed)) = seeds
        .iter()
        .enumerate()
        .find(|(_, seed)| seed.len() > MAX_SEED_LEN)
    {
        return Err(TransactionBuilderError::derivation(
            account,
            format!(
                "seed {} is {} bytes, at most {} allowed",
                index,
                seed.len(),
                MAX_SEED_LEN
            ),
        ));
    }

    for bump in (0..=u8::MAX).rev() {
        let bump_seed = [bump];
        let with_bump: Vec<&[u8]> = seeds
            .iter()
            .copied()
            .chain(std::iter::once(&bump_seed[..]))
            .collect();

        match Pubkey::create_program_address(&with_bump, program_id) {
            Ok(address) => return Ok((address, bump)),
            // Landed on the curve, try the next bump
            Err(PubkeyError::InvalidSeeds) => continue,
            Err(PubkeyError::MaxSeedLengthExceeded) => {
                return Err(TransactionBuilderError::derivation(
                    account,
                    "seed length exceeded",
                ))
            }
            Err(e) => {
                return Err(TransactionBuilderError::Configuration(format!(
                    "cannot derive {} under {}: {}",
                    account, program_id, e
                )))
            }
        }
    }

    Err(TransactionBuilderError::Configuration(format!(
        "no viable bump for {} under {}",
        account, program_id
    )))
}

/// Seed encoding for a listing id
#[inline]
pub fn listing_id_seed(id: u64) -> [u8; 8] {
    id.to_le_bytes()
}

/// Resolves every program-owned address the purchase flow touches
#[derive(Debug, Clone, Copy)]
pub struct AddressResolver {
    program_id: Pubkey,
}

impl Default for AddressResolver {
    fn default() -> Self {
        Self::new(FRACTIONS_PROGRAM_ID)
    }
}

impl AddressResolver {
    pub const fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn manager(&self) -> Result<Pubkey, TransactionBuilderError> {
        derive("manager", &[MANAGER_SEED], &self.program_id).map(|(address, _)| address)
    }

    pub fn protocol(&self) -> Result<Pubkey, TransactionBuilderError> {
        derive("protocol", &[PROTOCOL_SEED], &self.program_id).map(|(address, _)| address)
    }

    pub fn listing(&self, id: u64) -> Result<Pubkey, TransactionBuilderError> {
        let id_seed = listing_id_seed(id);
        derive("listing", &[LISTING_SEED, &id_seed], &self.program_id).map(|(address, _)| address)
    }

    /// Object (asset record) address keyed by its opaque reference string
    pub fn object(&self, reference: &str) -> Result<Pubkey, TransactionBuilderError> {
        derive("object", &[OBJECT_SEED, reference.as_bytes()], &self.program_id)
            .map(|(address, _)| address)
    }

    pub fn buyer_profile(&self, buyer: &Pubkey) -> Result<Pubkey, TransactionBuilderError> {
        derive("buyer_profile", &[BUYER_SEED, buyer.as_ref()], &self.program_id)
            .map(|(address, _)| address)
    }

    /// Associated currency account for `(owner, mint)`.
    ///
    /// Derived under the associated-token program, not the fractions program.
    pub fn currency_account(
        &self,
        account: &'static str,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Pubkey, TransactionBuilderError> {
        derive(
            account,
            &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
            &ASSOCIATED_TOKEN_PROGRAM_ID,
        )
        .map(|(address, _)| address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spl_associated_token_account::get_associated_token_address;

    #[test]
    fn test_derive_matches_sdk_search() {
        let program = FRACTIONS_PROGRAM_ID;
        let id_seed = listing_id_seed(10817);
        let seeds: [&[u8]; 2] = [LISTING_SEED, &id_seed];

        let (ours, our_bump) = derive("listing", &seeds, &program).unwrap();
        let (sdk, sdk_bump) = Pubkey::find_program_address(&seeds, &program);

        assert_eq!(ours, sdk);
        assert_eq!(our_bump, sdk_bump);
    }

    #[test]
    fn test_derived_address_is_off_curve() {
        let resolver = AddressResolver::default();
        let listing = resolver.listing(1).unwrap();
        assert!(!listing.is_on_curve());
    }

    #[test]
    fn test_listing_is_deterministic() {
        let resolver = AddressResolver::default();
        assert_eq!(resolver.listing(10817).unwrap(), resolver.listing(10817).unwrap());
        assert_ne!(resolver.listing(10817).unwrap(), resolver.listing(10818).unwrap());
    }

    #[test]
    fn test_listing_id_width_matters() {
        let resolver = AddressResolver::default();
        let correct = resolver.listing(10817).unwrap();

        let narrow = 10817u32.to_le_bytes();
        let (wrong, _) = derive("listing", &[LISTING_SEED, &narrow], resolver.program_id()).unwrap();
        assert_ne!(correct, wrong);

        let big_endian = 10817u64.to_be_bytes();
        let (wrong, _) =
            derive("listing", &[LISTING_SEED, &big_endian], resolver.program_id()).unwrap();
        assert_ne!(correct, wrong);
    }

    #[test]
    fn test_object_reference_too_long() {
        let resolver = AddressResolver::default();
        let reference = "x".repeat(MAX_SEED_LEN + 1);
        let err = resolver.object(&reference).unwrap_err();
        assert!(matches!(
            err,
            TransactionBuilderError::Derivation { account: "object", .. }
        ));
        assert_eq!(err.kind(), crate::tx_builder::ErrorKind::ClientInput);
    }

    #[test]
    fn test_object_reference_at_limit() {
        let resolver = AddressResolver::default();
        let reference = "y".repeat(MAX_SEED_LEN);
        assert!(resolver.object(&reference).is_ok());
    }

    #[test]
    fn test_too_many_seeds_rejected() {
        let seeds: Vec<&[u8]> = vec![&b"s"[..]; MAX_SEEDS];
        let err = derive("test", &seeds, &FRACTIONS_PROGRAM_ID).unwrap_err();
        assert_eq!(err.code(), "DERIVATION_FAILED");
    }

    #[test]
    fn test_singletons_are_distinct() {
        let resolver = AddressResolver::default();
        assert_ne!(resolver.manager().unwrap(), resolver.protocol().unwrap());
    }

    #[test]
    fn test_currency_account_matches_associated_token_address() {
        let resolver = AddressResolver::default();
        let owner = Pubkey::new_unique();
        let ours = resolver
            .currency_account("buyer_currency", &owner, &CURRENCY_MINT)
            .unwrap();
        assert_eq!(ours, get_associated_token_address(&owner, &CURRENCY_MINT));
    }

    #[test]
    fn test_currency_account_for_off_curve_owner() {
        let resolver = AddressResolver::default();
        let listing = resolver.listing(7).unwrap();
        let ours = resolver
            .currency_account("listing_currency", &listing, &CURRENCY_MINT)
            .unwrap();
        assert_eq!(ours, get_associated_token_address(&listing, &CURRENCY_MINT));
    }

    #[test]
    fn test_program_id_changes_addresses() {
        let a = AddressResolver::default();
        let b = AddressResolver::new(Pubkey::new_unique());
        assert_ne!(a.object("25.766,-80.132").unwrap(), b.object("25.766,-80.132").unwrap());
    }
}
