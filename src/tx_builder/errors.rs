//! Error types for the purchase transaction assembler
//!
//! Every failure carries a discriminated [`ErrorKind`] so the HTTP layer can
//! tell "fix your input" apart from "retry" and "contact support":
//! - Client input: malformed ids, references, URIs or buyer keys
//! - Retryable: anchor fetch failures and timeouts
//! - Configuration: fee payer problems, bump exhaustion, bad endpoints
//! - Internal: invariant violations inside the assembler

use thiserror::Error;

/// Coarse classification used for status mapping and retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller sent something we cannot build from
    ClientInput,
    /// Transient failure; the caller may retry the same request
    Retryable,
    /// Service is misconfigured; retrying will not help
    Configuration,
    /// Bug or broken invariant
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientInput => "client_input",
            Self::Retryable => "retryable",
            Self::Configuration => "configuration",
            Self::Internal => "internal",
        }
    }
}

/// Error type for all assembler operations
#[derive(Error, Debug)]
pub enum TransactionBuilderError {
    /// A program address could not be derived from the supplied seeds
    ///
    /// Raised for seeds that exceed the ledger's length limits, which in
    /// practice means an over-long object reference.
    #[error("Address derivation failed ({account}): {reason}")]
    Derivation {
        /// Binding name of the account being resolved
        account: &'static str,
        reason: String,
    },

    /// Request field failed validation before any derivation happened
    #[error("Invalid input ({field}): {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// Buyer identity collides with the server fee payer
    #[error("Buyer {0} must not be the fee payer")]
    BuyerIsFeePayer(String),

    /// Failed to build the program instruction
    #[error("Instruction build error (program={program}): {reason}")]
    InstructionBuild { program: String, reason: String },

    /// Failed to fetch a checkpoint anchor (recent blockhash)
    #[error("Anchor fetch failed: {0}")]
    Anchor(String),

    /// Anchor fetch did not complete within the configured bound
    #[error("Anchor fetch timed out after {timeout_ms}ms")]
    AnchorTimeout { timeout_ms: u64 },

    /// Failed to compile or sign the message
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Failed to encode or decode the transport form
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Configuration or startup error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal invariant violation
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TransactionBuilderError {
    /// Discriminated kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Derivation { .. } | Self::InvalidInput { .. } | Self::BuyerIsFeePayer(_) => {
                ErrorKind::ClientInput
            }
            Self::Anchor(_) | Self::AnchorTimeout { .. } => ErrorKind::Retryable,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::InstructionBuild { .. }
            | Self::Signing(_)
            | Self::Encoding(_)
            | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::Derivation { .. } => "DERIVATION_FAILED",
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::BuyerIsFeePayer(_) => "BUYER_IS_FEE_PAYER",
            Self::InstructionBuild { .. } => "INSTRUCTION_BUILD_FAILED",
            Self::Anchor(_) => "ANCHOR_UNAVAILABLE",
            Self::AnchorTimeout { .. } => "ANCHOR_TIMEOUT",
            Self::Signing(_) => "SIGNING_FAILED",
            Self::Encoding(_) => "ENCODING_FAILED",
            Self::Configuration(_) => "CONFIGURATION",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Check if this error is potentially retryable by the caller
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Retryable
    }

    /// Get the error category for metrics and observability
    pub fn category(&self) -> &'static str {
        match self {
            Self::Derivation { .. } => "derivation",
            Self::InvalidInput { .. } | Self::BuyerIsFeePayer(_) => "validation",
            Self::InstructionBuild { .. } => "instruction",
            Self::Anchor(_) | Self::AnchorTimeout { .. } => "anchor",
            Self::Signing(_) => "signing",
            Self::Encoding(_) => "encoding",
            Self::Configuration(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}

// Convenience constructors for common error scenarios
impl TransactionBuilderError {
    pub fn derivation(account: &'static str, reason: impl Into<String>) -> Self {
        Self::Derivation {
            account,
            reason: reason.into(),
        }
    }

    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn instruction_failed(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InstructionBuild {
            program: program.into(),
            reason: reason.into(),
        }
    }

    pub fn anchor_unavailable(reason: impl Into<String>) -> Self {
        Self::Anchor(reason.into())
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal(reason.into())
    }
}
