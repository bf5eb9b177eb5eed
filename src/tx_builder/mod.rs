//! Fractional-purchase transaction builder
//!
//! Turns a buyer identity and a listing reference into a partially signed
//! `buy_fraction` bundle for the caller's wallet to complete.
//!
//! ## Architecture
//!
//! - **addresses**: program-derived address resolution
//! - **program**: typed binding for the on-chain method (accounts + args)
//! - **signers**: fee payer / ephemeral asset identity / buyer slots
//! - **instructions**: resolves accounts and builds the instruction
//! - **builder**: anchor fetch, message compile, partial signing
//! - **output**: the signed artifact and its base64 transport form
//! - **context**: the validated per-request order
//! - **errors**: discriminated error taxonomy
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use fraction_assembler::tx_builder::{
//!     InstructionBuilder, PurchaseOrder, SignerCoordinator, TxAssembler,
//! };
//! # async fn example(
//! #     fee_payer: &solana_sdk::signature::Keypair,
//! #     assembler: &TxAssembler,
//! #     buyer: solana_sdk::pubkey::Pubkey,
//! # ) -> Result<(), fraction_assembler::tx_builder::TransactionBuilderError> {
//! let order = PurchaseOrder::new(10817, "ipfs://abc123", "25.766,-80.132", buyer, 1);
//! let plan = SignerCoordinator::new(fee_payer).plan(order.buyer)?;
//! let ix = InstructionBuilder::default().build(&order, &plan)?;
//! let output = assembler.assemble(plan, &[ix]).await?;
//! let transaction = output.to_base64()?;
//! # Ok(())
//! # }
//! ```

pub mod addresses;
pub mod builder;
pub mod context;
pub mod errors;
pub mod instructions;
pub mod output;
pub mod program;
pub mod signers;

pub use addresses::AddressResolver;
pub use builder::{compile_and_sign, TxAssembler};
pub use context::PurchaseOrder;
pub use errors::{ErrorKind, TransactionBuilderError};
pub use instructions::{check_account_layout, InstructionBuilder};
pub use output::{decode_base64, TxBuildOutput};
pub use program::{BuyFractionAccounts, BuyFractionArgs, BUY_FRACTION_ACCOUNTS};
pub use signers::{Custody, EphemeralIdentity, SignerCoordinator, SignerPlan, SignerRole, SignerSlot};
