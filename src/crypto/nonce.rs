//! Nonce construction and counter allocation.
//!
//! Nonces are 12 bytes:
//! - Zeros (8 bytes)
//! - Counter (4 bytes, big-endian)
//!
//! Each direction owns its own counter. Both peers start at zero, so the
//! sender's write counter and the receiver's read counter stay in lockstep
//! only as long as the frame channel delivers every frame once and in order.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::{AEAD_NONCE_SIZE, CryptoError, MAX_NONCE_COUNTER, NONCE_COUNTER_OFFSET};

/// Construct the 12-byte nonce for a frame counter.
///
/// Layout:
/// ```text
/// [ zeros (8) | counter (4, BE) ]
/// ```
pub fn generate_iv(counter: u32) -> [u8; AEAD_NONCE_SIZE] {
    let mut iv = [0u8; AEAD_NONCE_SIZE];
    iv[NONCE_COUNTER_OFFSET..].copy_from_slice(&counter.to_be_bytes());
    iv
}

/// Recover the counter from a nonce.
///
/// Returns `None` if the zero prefix is not zero.
pub fn parse_iv(iv: &[u8; AEAD_NONCE_SIZE]) -> Option<u32> {
    if iv[..NONCE_COUNTER_OFFSET].iter().any(|&b| b != 0) {
        return None;
    }
    Some(u32::from_be_bytes([iv[8], iv[9], iv[10], iv[11]]))
}

/// Per-direction frame counter.
///
/// Every call to [`next`](Self::next) consumes exactly one value, whether or
/// not the frame it was allocated for is ever sent or decrypted. Values are
/// kept in 64 bits so the counter cannot wrap back onto a used nonce.
#[derive(Debug, Default)]
pub struct NonceCounter {
    value: AtomicU64,
}

impl NonceCounter {
    /// Create a counter starting at zero.
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    /// Allocate the next counter value.
    ///
    /// Safe to call from many threads at once: each caller observes a
    /// distinct value.
    pub fn next(&self) -> Result<u32, CryptoError> {
        // Uniqueness only needs the RMW to be atomic.
        let count = self.value.fetch_add(1, Ordering::Relaxed);
        if count > MAX_NONCE_COUNTER {
            return Err(CryptoError::CounterExhaustion);
        }
        Ok(count as u32)
    }

    /// Number of values allocated so far.
    pub fn count(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    pub(crate) fn starting_at(value: u64) -> Self {
        Self {
            value: AtomicU64::new(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_iv_layout() {
        let iv = generate_iv(0x0102_0304);

        assert_eq!(iv.len(), AEAD_NONCE_SIZE);
        assert_eq!(hex::encode(iv), "000000000000000001020304");
    }

    #[test]
    fn test_iv_zero_counter() {
        assert_eq!(generate_iv(0), [0u8; AEAD_NONCE_SIZE]);
        assert_eq!(hex::encode(generate_iv(1)), "000000000000000000000001");
        assert_eq!(
            hex::encode(generate_iv(u32::MAX)),
            "0000000000000000ffffffff"
        );
    }

    #[test]
    fn test_parse_iv() {
        assert_eq!(parse_iv(&generate_iv(42)), Some(42));

        let mut iv = generate_iv(42);
        iv[0] = 0x01;
        assert_eq!(parse_iv(&iv), None);
    }

    #[test]
    fn test_counter_sequence() {
        let counter = NonceCounter::new();

        for expected in 0..10 {
            assert_eq!(counter.next().unwrap(), expected);
        }
        assert_eq!(counter.count(), 10);
    }

    #[test]
    fn test_counter_exhaustion() {
        let counter = NonceCounter::starting_at(MAX_NONCE_COUNTER);

        assert_eq!(counter.next().unwrap(), u32::MAX);
        assert_eq!(counter.next(), Err(CryptoError::CounterExhaustion));
        assert_eq!(counter.next(), Err(CryptoError::CounterExhaustion));

        // Failed allocations are still consumed
        assert_eq!(counter.count(), MAX_NONCE_COUNTER + 3);
    }

    #[test]
    fn test_counter_concurrent_unique() {
        let counter = Arc::new(NonceCounter::new());
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                std::thread::spawn(move || {
                    (0..250).map(|_| counter.next().unwrap()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in threads {
            for value in handle.join().unwrap() {
                assert!(seen.insert(value), "counter value {value} reused");
            }
        }

        assert_eq!(seen, (0..2000).collect::<HashSet<_>>());
    }
}
