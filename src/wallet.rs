//! Fee payer key management
//!
//! The fee payer is loaded once at startup into a process-wide, read-only
//! cell and never re-read. Secret bytes pass through `Zeroizing` buffers
//! while loading; only the public key is ever logged.

use anyhow::{bail, Context, Result};
use once_cell::sync::OnceCell;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use std::fmt;
use zeroize::Zeroizing;

static FEE_PAYER: OnceCell<FeePayer> = OnceCell::new();

/// Persistent server key that pays network fees
pub struct FeePayer {
    keypair: Keypair,
}

impl FeePayer {
    /// Load from a keypair file (JSON array of 64 bytes, or 64 raw bytes)
    pub fn from_file(path: &str) -> Result<Self> {
        let file_bytes = Zeroizing::new(
            std::fs::read(path).with_context(|| format!("Failed to read keypair file: {}", path))?,
        );

        let secret = if file_bytes.len() == 64 {
            Zeroizing::new(file_bytes.to_vec())
        } else {
            Zeroizing::new(
                serde_json::from_slice::<Vec<u8>>(&file_bytes)
                    .context("Failed to parse keypair JSON")?,
            )
        };
        Self::from_secret_bytes(&secret)
    }

    /// Load from a base58-encoded 64-byte secret
    pub fn from_base58(encoded: &str) -> Result<Self> {
        let secret = Zeroizing::new(
            bs58::decode(encoded.trim())
                .into_vec()
                .context("Fee payer secret is not valid base58")?,
        );
        Self::from_secret_bytes(&secret)
    }

    fn from_secret_bytes(secret: &[u8]) -> Result<Self> {
        if secret.len() != 64 {
            bail!("Invalid keypair length: expected 64 bytes, got {}", secret.len());
        }
        if secret.iter().all(|&b| b == 0) {
            bail!("Invalid keypair: all-zero key rejected");
        }
        let keypair = Keypair::try_from(secret).context("Invalid keypair bytes")?;
        Ok(Self { keypair })
    }

    pub fn from_keypair(keypair: Keypair) -> Self {
        Self { keypair }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }
}

impl fmt::Debug for FeePayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FeePayer").field(&self.pubkey()).finish()
    }
}

/// Install the process-wide fee payer. Fails if one is already installed.
pub fn init_fee_payer(fee_payer: FeePayer) -> Result<&'static FeePayer> {
    let pubkey = fee_payer.pubkey();
    FEE_PAYER
        .set(fee_payer)
        .map_err(|_| anyhow::anyhow!("Fee payer already initialised"))?;
    tracing::info!(pubkey = %pubkey, "Fee payer loaded");
    FEE_PAYER
        .get()
        .ok_or_else(|| anyhow::anyhow!("Fee payer missing after initialisation"))
}

/// Resolve the fee payer from wallet configuration.
///
/// The environment secret wins over the keypair file when both are set.
pub fn load_fee_payer(config: &crate::config::WalletConfig) -> Result<FeePayer> {
    if let Some(var) = config.secret_env.as_deref() {
        if let Ok(secret) = std::env::var(var) {
            let secret = Zeroizing::new(secret);
            return FeePayer::from_base58(&secret)
                .with_context(|| format!("Failed to load fee payer from ${}", var));
        }
    }
    match config.keypair_path.as_deref() {
        Some(path) => FeePayer::from_file(path),
        None => bail!("No fee payer configured: set wallet.keypair_path or wallet.secret_env"),
    }
}
