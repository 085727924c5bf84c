//! Error types for the crypto layer.

use thiserror::Error;

/// Errors raised while sealing or opening frames.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// AEAD encryption failed.
    #[error("AEAD encryption failed")]
    EncryptionFailed,

    /// AEAD decryption failed (invalid tag or corrupted).
    #[error("AEAD decryption failed (invalid tag or corrupted)")]
    DecryptionFailed,

    /// Nonce counter exhausted - a new handshake is required.
    #[error("nonce counter exhausted - a new handshake is required")]
    CounterExhaustion,

    /// Key material has the wrong length for the cipher.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected length in bytes.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// A socket was built without a cipher for one direction.
    #[error("missing {0} cipher")]
    MissingCipher(&'static str),
}

impl CryptoError {
    /// Check if this error means the session keys can no longer be used.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CryptoError::CounterExhaustion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_errors() {
        assert!(CryptoError::CounterExhaustion.is_fatal());

        assert!(!CryptoError::DecryptionFailed.is_fatal());
        assert!(!CryptoError::EncryptionFailed.is_fatal());
        assert!(!CryptoError::MissingCipher("write").is_fatal());
    }

    #[test]
    fn test_error_messages() {
        let err = CryptoError::InvalidKeyLength {
            expected: 32,
            actual: 16,
        };
        assert_eq!(err.to_string(), "invalid key length: expected 32, got 16");
        assert_eq!(
            CryptoError::MissingCipher("read").to_string(),
            "missing read cipher"
        );
    }
}
