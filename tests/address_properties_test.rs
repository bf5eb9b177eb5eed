//! Property tests for program address derivation
//!
//! - Determinism over arbitrary ids, references and buyers
//! - Non-collision between distinct listing ids and references
//! - Agreement with the SDK's `find_program_address`
//! - Width sensitivity of numeric seeds

use fraction_assembler::tx_builder::addresses::{
    derive, listing_id_seed, AddressResolver, FRACTIONS_PROGRAM_ID, LISTING_SEED, OBJECT_SEED,
};
use proptest::prelude::*;
use solana_sdk::pubkey::Pubkey;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn listing_derivation_is_deterministic(id in any::<u64>()) {
        let resolver = AddressResolver::default();
        prop_assert_eq!(resolver.listing(id).unwrap(), resolver.listing(id).unwrap());
    }

    #[test]
    fn distinct_listing_ids_do_not_collide(a in any::<u64>(), b in any::<u64>()) {
        prop_assume!(a != b);
        let resolver = AddressResolver::default();
        prop_assert_ne!(resolver.listing(a).unwrap(), resolver.listing(b).unwrap());
    }

    #[test]
    fn distinct_references_do_not_collide(a in "[ -~]{1,32}", b in "[ -~]{1,32}") {
        prop_assume!(a != b);
        let resolver = AddressResolver::default();
        prop_assert_ne!(resolver.object(&a).unwrap(), resolver.object(&b).unwrap());
    }

    #[test]
    fn derive_agrees_with_sdk(id in any::<u64>(), reference in "[ -~]{0,32}") {
        let seed = listing_id_seed(id);
        let ours = derive("listing", &[LISTING_SEED, &seed], &FRACTIONS_PROGRAM_ID).unwrap();
        let sdk = Pubkey::find_program_address(&[LISTING_SEED, &seed], &FRACTIONS_PROGRAM_ID);
        prop_assert_eq!(ours, sdk);

        let ours = derive("object", &[OBJECT_SEED, reference.as_bytes()], &FRACTIONS_PROGRAM_ID).unwrap();
        let sdk = Pubkey::find_program_address(&[OBJECT_SEED, reference.as_bytes()], &FRACTIONS_PROGRAM_ID);
        prop_assert_eq!(ours, sdk);
        prop_assert!(!ours.0.is_on_curve());
    }

    #[test]
    fn wrong_width_id_gives_different_address(id in any::<u32>()) {
        let correct = derive("listing", &[LISTING_SEED, &(id as u64).to_le_bytes()], &FRACTIONS_PROGRAM_ID).unwrap();
        let narrow = derive("listing", &[LISTING_SEED, &id.to_le_bytes()], &FRACTIONS_PROGRAM_ID).unwrap();
        prop_assert_ne!(correct.0, narrow.0);
    }

    #[test]
    fn buyer_profiles_are_per_buyer(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
        prop_assume!(a != b);
        let resolver = AddressResolver::default();
        let (a, b) = (Pubkey::new_from_array(a), Pubkey::new_from_array(b));
        prop_assert_ne!(resolver.buyer_profile(&a).unwrap(), resolver.buyer_profile(&b).unwrap());
    }
}
