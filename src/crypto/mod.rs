//! Noise socket - Security Layer
//!
//! Per-frame cryptography for an established session:
//! - Counter nonces (zero prefix, big-endian counter)
//! - AEAD seal/open behind the [`FrameCipher`] seam
//!
//! Key agreement happens before this layer and is out of scope.

mod cipher;
mod nonce;

pub use cipher::*;
pub use nonce::*;
