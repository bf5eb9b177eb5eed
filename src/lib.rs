//! Fraction Assembler - partially signed purchase bundles for fractional listings
//!
//! Given a buyer identity and a listing reference, resolves every account the
//! `buy_fraction` program method needs, builds the instruction, signs the
//! server-held slots and returns a bundle for the buyer's wallet to finish.

pub mod buy_engine;
pub mod compat;
pub mod config;
pub mod endpoints;
pub mod metrics;
pub mod observability;
pub mod security;
pub mod structured_logging;
pub mod tx_builder;
pub mod types;
pub mod wallet;

// Component modules with non-standard paths (directories with spaces)
#[path = "rpc manager/mod.rs"]
pub mod rpc_manager;

// Re-export commonly used types
pub use buy_engine::BuyEngine;
pub use config::Config;
pub use solana_sdk::{message::VersionedMessage, pubkey::Pubkey, signature::Signature};
