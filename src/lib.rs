//! # Noise socket
//!
//! Encrypted, ordered frame transport for post-handshake sessions.
//!
//! A [`NoiseSocket`] sits between a raw frame channel (length-prefixed
//! delivery of opaque blobs) and application code exchanging plaintext
//! messages. Given the two directional keys produced by a Noise-style
//! handshake, it provides:
//!
//! - **Confidentiality and integrity**: every frame is sealed with an AEAD
//!   (ChaCha20-Poly1305 by default, AES-256-GCM with the `aes-gcm` feature)
//! - **Nonce safety**: per-direction atomic counters, never reused, never wrapped
//! - **Resilience**: a frame that fails to decrypt is logged and dropped
//!
//! The handshake, the framing protocol and connection lifecycle belong to
//! the layers around this crate.
//!
//! ## Feature Flags
//!
//! - `memory` (default): In-process [`MemoryFrameChannel`] pair
//! - `aes-gcm`: AES-256-GCM key constructor
//!
//! ## Modules
//!
//! - [`core`]: Constants and error types
//! - [`crypto`]: Nonce construction and the AEAD seam
//! - [`transport`]: Frame channel trait and the encrypted socket
//!
//! ## Example Usage
//!
//! ```rust
//! use noise_socket::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (left, right) = MemoryFrameChannel::pair();
//!
//! let alice = NoiseSocketBuilder::new()
//!     .write_key([0x01; 32])
//!     .read_key([0x02; 32])
//!     .build(left)?;
//! let bob = NoiseSocketBuilder::new()
//!     .write_key([0x02; 32])
//!     .read_key([0x01; 32])
//!     .build(right)?;
//!
//! let mut inbox = bob.subscribe();
//! alice.send_frame(b"hello").await?;
//! assert_eq!(inbox.recv().await.as_deref(), Some(&b"hello"[..]));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod core;
pub mod crypto;
pub mod transport;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::*;
    pub use crate::crypto::*;
    pub use crate::transport::*;
}

pub use crate::core::CryptoError;
pub use crate::crypto::{FrameCipher, generate_iv};
#[cfg(feature = "memory")]
#[cfg_attr(docsrs, doc(cfg(feature = "memory")))]
pub use crate::transport::MemoryFrameChannel;
pub use crate::transport::{FrameChannel, NoiseSocket, NoiseSocketBuilder, SocketError};
