//! AEAD seam for frame encryption.
//!
//! The socket only needs seal/open with a 96-bit nonce and no associated
//! data. Anything implementing the RustCrypto [`Aead`] trait with a 12-byte
//! nonce gets [`FrameCipher`] for free.

use chacha20poly1305::{
    ChaCha20Poly1305,
    aead::{Aead, AeadCore, KeyInit, Nonce, consts::U12, generic_array::typenum::Unsigned},
};

use crate::core::{AEAD_KEY_SIZE, AEAD_NONCE_SIZE, CryptoError};

/// A keyed AEAD cipher for one direction of a socket.
pub trait FrameCipher: Send + Sync {
    /// Encrypt a frame.
    ///
    /// Returns ciphertext with the authentication tag appended.
    fn seal(&self, iv: &[u8; AEAD_NONCE_SIZE], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Verify and decrypt a frame.
    fn open(&self, iv: &[u8; AEAD_NONCE_SIZE], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

impl<A> FrameCipher for A
where
    A: Aead + AeadCore<NonceSize = U12> + Send + Sync,
{
    fn seal(&self, iv: &[u8; AEAD_NONCE_SIZE], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.encrypt(Nonce::<A>::from_slice(iv), plaintext)
            .map_err(|_| CryptoError::EncryptionFailed)
    }

    fn open(&self, iv: &[u8; AEAD_NONCE_SIZE], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if ciphertext.len() < <A as AeadCore>::TagSize::USIZE {
            return Err(CryptoError::DecryptionFailed);
        }

        self.decrypt(Nonce::<A>::from_slice(iv), ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed)
    }
}

/// Build a ChaCha20-Poly1305 cipher from a 32-byte key.
pub fn chacha20_poly1305(key: &[u8]) -> Result<ChaCha20Poly1305, CryptoError> {
    ChaCha20Poly1305::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength {
        expected: AEAD_KEY_SIZE,
        actual: key.len(),
    })
}

/// Build an AES-256-GCM cipher from a 32-byte key.
#[cfg(feature = "aes-gcm")]
pub fn aes_256_gcm(key: &[u8]) -> Result<aes_gcm::Aes256Gcm, CryptoError> {
    <aes_gcm::Aes256Gcm as KeyInit>::new_from_slice(key).map_err(|_| {
        CryptoError::InvalidKeyLength {
            expected: AEAD_KEY_SIZE,
            actual: key.len(),
        }
    })
}
