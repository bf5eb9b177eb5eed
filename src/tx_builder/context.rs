//! Per-request purchase order
//!
//! The validated form of a buy request. Produced once by the request layer
//! and read by every later stage; nothing in it is mutated after creation.

use solana_sdk::pubkey::Pubkey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseOrder {
    /// Numeric listing id (seeded as u64 little-endian)
    pub listing_id: u64,
    /// Metadata URI passed verbatim as the instruction argument
    pub uri: String,
    /// Opaque object reference, e.g. a geocoordinate string
    pub reference: String,
    /// Buyer's public identity
    pub buyer: Pubkey,
    /// Requested fraction count. Accepted but not encoded into the
    /// instruction; `buy_fraction` takes no amount argument.
    pub amount: u64,
}

impl PurchaseOrder {
    pub fn new(
        listing_id: u64,
        uri: impl Into<String>,
        reference: impl Into<String>,
        buyer: Pubkey,
        amount: u64,
    ) -> Self {
        Self {
            listing_id,
            uri: uri.into(),
            reference: reference.into(),
            buyer,
            amount,
        }
    }
}
