//! Socket error types.
//!
//! Only the send path returns errors. Inbound frames that fail to decrypt
//! are logged and dropped; they never surface here.

use std::error::Error as StdError;

use thiserror::Error;

use crate::core::CryptoError;

/// Errors returned by [`NoiseSocket::send_frame`](super::NoiseSocket::send_frame).
///
/// `E` is the frame channel's own error type, passed through unchanged.
#[derive(Debug, Error)]
pub enum SocketError<E>
where
    E: StdError + 'static,
{
    /// The frame channel failed to send the encrypted frame.
    #[error("frame channel error: {0}")]
    Channel(#[source] E),

    /// The frame could not be encrypted.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

impl<E> SocketError<E>
where
    E: StdError + 'static,
{
    /// The frame channel's error, if that is where the send failed.
    pub fn channel_error(&self) -> Option<&E> {
        match self {
            SocketError::Channel(err) => Some(err),
            SocketError::Crypto(_) => None,
        }
    }

    /// Unwrap the frame channel's error.
    pub fn into_channel_error(self) -> Option<E> {
        match self {
            SocketError::Channel(err) => Some(err),
            SocketError::Crypto(_) => None,
        }
    }

    /// Check if the socket can no longer send with its current keys.
    ///
    /// Channel errors are left to the caller; retry policy belongs to the
    /// channel or the application.
    pub fn is_fatal(&self) -> bool {
        match self {
            SocketError::Channel(_) => false,
            SocketError::Crypto(err) => err.is_fatal(),
        }
    }
}

/// Result type for socket operations.
pub type SocketResult<T, E> = Result<T, SocketError<E>>;

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_channel_error_passthrough() {
        let err: SocketError<io::Error> =
            SocketError::Channel(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));

        assert_eq!(
            err.channel_error().map(io::Error::kind),
            Some(io::ErrorKind::BrokenPipe)
        );
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "frame channel error: pipe closed");
        assert_eq!(
            err.into_channel_error().map(|e| e.kind()),
            Some(io::ErrorKind::BrokenPipe)
        );
    }

    #[test]
    fn test_crypto_error_conversion() {
        let err: SocketError<io::Error> = CryptoError::CounterExhaustion.into();

        assert!(err.channel_error().is_none());
        assert!(err.is_fatal());
        assert!(matches!(
            err,
            SocketError::Crypto(CryptoError::CounterExhaustion)
        ));
    }
}
