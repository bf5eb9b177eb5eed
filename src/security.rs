//! Security and validation module

use solana_sdk::pubkey::Pubkey;

/// Validator for purchase request fields
pub mod validator {
    use super::*;
    use crate::tx_builder::{addresses, TransactionBuilderError};
    use std::str::FromStr;

    /// Metadata URIs longer than this cannot fit in one bundle next to
    /// fourteen accounts and three signatures
    pub const MAX_URI_LEN: usize = 200;

    /// Parse the buyer's base58 public identity
    pub fn parse_buyer(encoded: &str) -> Result<Pubkey, TransactionBuilderError> {
        let buyer = Pubkey::from_str(encoded.trim()).map_err(|e| {
            TransactionBuilderError::invalid_input("publicKey", format!("not a valid public key: {}", e))
        })?;
        if buyer == Pubkey::default() || is_system_address(&buyer) {
            return Err(TransactionBuilderError::invalid_input(
                "publicKey",
                format!("{} is a reserved address", buyer),
            ));
        }
        Ok(buyer)
    }

    /// Validate the metadata URI argument
    pub fn validate_uri(uri: &str) -> Result<(), TransactionBuilderError> {
        if uri.is_empty() {
            return Err(TransactionBuilderError::invalid_input("uri", "must not be empty"));
        }
        if uri.len() > MAX_URI_LEN {
            return Err(TransactionBuilderError::invalid_input(
                "uri",
                format!("{} bytes exceeds the {} byte limit", uri.len(), MAX_URI_LEN),
            ));
        }
        Ok(())
    }

    /// Validate the object reference. Length is checked by address derivation.
    pub fn validate_reference(reference: &str) -> Result<(), TransactionBuilderError> {
        if reference.is_empty() {
            return Err(TransactionBuilderError::invalid_input("reference", "must not be empty"));
        }
        Ok(())
    }

    /// Check if address is a well-known program address
    pub fn is_system_address(pubkey: &Pubkey) -> bool {
        *pubkey == addresses::SYSTEM_PROGRAM_ID
            || *pubkey == addresses::TOKEN_PROGRAM_ID
            || *pubkey == addresses::ASSOCIATED_TOKEN_PROGRAM_ID
            || *pubkey == addresses::FRACTIONS_PROGRAM_ID
    }
}

#[cfg(test)]
mod tests {
    use super::validator::*;
    use solana_sdk::pubkey::Pubkey;

    #[test]
    fn test_parse_buyer() {
        let buyer = Pubkey::new_unique();
        assert_eq!(parse_buyer(&buyer.to_string()).unwrap(), buyer);
        assert_eq!(parse_buyer(&format!(" {} ", buyer)).unwrap(), buyer);

        for bad in ["", "not-a-key", "11111111111111111111111111111111"] {
            let err = parse_buyer(bad).unwrap_err();
            assert_eq!(err.code(), "INVALID_INPUT", "{bad:?}");
        }
        assert!(parse_buyer(&spl_token::ID.to_string()).is_err());
    }

    #[test]
    fn test_validate_uri() {
        assert!(validate_uri("ipfs://abc123").is_ok());
        assert!(validate_uri("").is_err());
        assert!(validate_uri(&"u".repeat(MAX_URI_LEN)).is_ok());
        assert!(validate_uri(&"u".repeat(MAX_URI_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_reference() {
        assert!(validate_reference("25.766,-80.132").is_ok());
        assert!(validate_reference("").is_err());
    }
}
