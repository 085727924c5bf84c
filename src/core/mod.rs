//! Noise socket core: constants and error types.
//!
//! Shared by the crypto and transport layers. No I/O lives here.

mod constants;
mod error;

pub use constants::*;
pub use error::*;
