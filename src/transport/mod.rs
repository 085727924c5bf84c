//! Noise socket - Transport Layer
//!
//! This module turns a stream of opaque ciphertext frames into a stream of
//! verified plaintext frames. It provides:
//!
//! - **Frame channel seam**: [`FrameChannel`], the ordered byte-blob transport underneath
//! - **Encrypted socket**: [`NoiseSocket`] and its [`NoiseSocketBuilder`]
//! - **In-memory channel**: [`MemoryFrameChannel`] for tests and local wiring (`memory` feature)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          Application Messages           │
//! ├─────────────────────────────────────────┤
//! │             NoiseSocket                 │  ← This module
//! │   counter nonces, seal/open, delivery   │
//! ├─────────────────────────────────────────┤
//! │             FrameChannel                │
//! │   length-prefixed frames, lifecycle     │
//! └─────────────────────────────────────────┘
//! ```

mod channel;
mod error;
#[cfg(feature = "memory")]
mod memory;
mod socket;

pub use channel::*;
pub use error::*;
#[cfg(feature = "memory")]
pub use memory::*;
pub use socket::*;
