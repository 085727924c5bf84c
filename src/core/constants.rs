//! Wire constants for the encrypted frame layer.
//!
//! These values define the nonce layout both peers derive independently and
//! MUST NOT be changed without breaking interoperability.

// =============================================================================
// AEAD PARAMETERS
// =============================================================================

/// Nonce size for the 96-bit-nonce AEADs (ChaCha20-Poly1305, AES-GCM).
pub const AEAD_NONCE_SIZE: usize = 12;

/// Authentication tag appended to every sealed frame.
pub const AEAD_TAG_SIZE: usize = 16;

/// Symmetric key size for both supported ciphers.
pub const AEAD_KEY_SIZE: usize = 32;

// =============================================================================
// NONCE LAYOUT
// =============================================================================

/// Offset of the big-endian frame counter inside the nonce.
///
/// Bytes `0..8` are always zero.
pub const NONCE_COUNTER_OFFSET: usize = 8;

/// Highest counter value that may be turned into a nonce.
pub const MAX_NONCE_COUNTER: u64 = u32::MAX as u64;
