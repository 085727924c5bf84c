//! Encrypted frame socket.
//!
//! [`NoiseSocket`] wraps a [`FrameChannel`] with one AEAD cipher per
//! direction. Outbound plaintext is sealed under the next write counter and
//! handed to the channel; inbound ciphertext is opened under the next read
//! counter and passed to the plaintext handler.
//!
//! ```text
//!   send_frame(plaintext)                      on_frame(plaintext)
//!          │                                          ▲
//!   seal(write_key, iv(write_counter++))      open(read_key, iv(read_counter++))
//!          │                                          │
//!          ▼                                          │
//!   ┌──────────────────────── FrameChannel ───────────────────────┐
//!   │              ordered, exactly-once opaque frames            │
//!   └─────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};
use zeroize::Zeroizing;

use crate::core::{AEAD_KEY_SIZE, CryptoError};
use crate::crypto::{FrameCipher, NonceCounter, chacha20_poly1305, generate_iv};

use super::channel::FrameChannel;
use super::error::SocketError;

/// Callback invoked with each decrypted frame, in arrival order.
pub type PlaintextHandler = Box<dyn FnMut(Vec<u8>) + Send + 'static>;

/// Receive half: owned by the channel's frame handler.
struct Inbound {
    read_key: Box<dyn FrameCipher>,
    read_counter: NonceCounter,
    on_frame: Mutex<Option<PlaintextHandler>>,
}

impl Inbound {
    /// Decrypt one inbound frame and deliver it.
    ///
    /// The read counter advances on every frame, including ones that fail to
    /// decrypt. A bad frame is dropped, not fatal.
    fn receive_encrypted_frame(&self, ciphertext: Vec<u8>) {
        let count = match self.read_counter.next() {
            Ok(count) => count,
            Err(err) => {
                warn!(len = ciphertext.len(), error = %err, "dropping inbound frame");
                return;
            }
        };

        let plaintext = match self.read_key.open(&generate_iv(count), &ciphertext) {
            Ok(plaintext) => plaintext,
            Err(err) => {
                warn!(counter = count, len = ciphertext.len(), error = %err, "failed to decrypt frame");
                return;
            }
        };

        trace!(counter = count, len = plaintext.len(), "received frame");
        match self.on_frame.lock().as_mut() {
            Some(handler) => handler(plaintext),
            None => warn!(counter = count, "no frame handler registered, dropping frame"),
        }
    }
}

/// An encrypted, ordered frame transport over a [`FrameChannel`].
///
/// Created once both directional ciphers exist, typically right after a
/// Noise handshake. Lives as long as the channel: after [`close`](Self::close)
/// a new handshake and a new socket are required.
///
/// # Ordering
///
/// Nonces are derived from counters both peers advance in lockstep. The
/// socket performs no resequencing or gap detection; a lost, duplicated or
/// reordered frame makes every later frame fail to decrypt.
pub struct NoiseSocket<C> {
    channel: C,
    write_key: Box<dyn FrameCipher>,
    write_counter: NonceCounter,
    inbound: Arc<Inbound>,
}

impl<C: FrameChannel> NoiseSocket<C> {
    /// Wrap an open channel.
    ///
    /// Registers the socket as the channel's frame handler. Performs no I/O.
    /// Frames that arrive before [`set_on_frame`](Self::set_on_frame) are
    /// dropped; use [`NoiseSocketBuilder`] to install the handler up front.
    pub fn new<W, R>(channel: C, write_key: W, read_key: R) -> Self
    where
        W: FrameCipher + 'static,
        R: FrameCipher + 'static,
    {
        Self::with_parts(channel, Box::new(write_key), Box::new(read_key), None)
    }

    fn with_parts(
        channel: C,
        write_key: Box<dyn FrameCipher>,
        read_key: Box<dyn FrameCipher>,
        on_frame: Option<PlaintextHandler>,
    ) -> Self {
        let inbound = Arc::new(Inbound {
            read_key,
            read_counter: NonceCounter::new(),
            on_frame: Mutex::new(on_frame),
        });

        let receiver = Arc::clone(&inbound);
        channel.set_frame_handler(Box::new(move |ciphertext: Vec<u8>| {
            receiver.receive_encrypted_frame(ciphertext)
        }));
        debug!("noise socket ready");

        Self {
            channel,
            write_key,
            write_counter: NonceCounter::new(),
            inbound,
        }
    }

    /// Encrypt and send one frame.
    ///
    /// The write counter is consumed before anything else happens, so a
    /// failed send never frees its nonce for reuse. Channel errors are
    /// returned unchanged in [`SocketError::Channel`] and not retried.
    pub async fn send_frame(&self, plaintext: &[u8]) -> Result<(), SocketError<C::Error>> {
        let count = self.write_counter.next().inspect_err(|err| {
            warn!(error = %err, "refusing to send frame");
        })?;
        let ciphertext = self.write_key.seal(&generate_iv(count), plaintext)?;

        trace!(counter = count, len = ciphertext.len(), "sending frame");
        self.channel
            .send_frame(ciphertext)
            .await
            .map_err(SocketError::Channel)
    }

    /// Set the callback for decrypted frames, replacing any previous one.
    ///
    /// The handler runs on the channel's delivery path, one frame at a time.
    /// It MUST NOT call back into `set_on_frame` or `subscribe`.
    pub fn set_on_frame<F>(&self, handler: F)
    where
        F: FnMut(Vec<u8>) + Send + 'static,
    {
        *self.inbound.on_frame.lock() = Some(Box::new(handler));
    }

    /// Receive decrypted frames through a queue instead of a callback.
    ///
    /// Replaces the current handler. Frames keep their arrival order.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<Vec<u8>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.set_on_frame(move |frame| {
            if tx.send(frame).is_err() {
                debug!("frame subscriber dropped");
            }
        });
        rx
    }

    /// The channel's cancellation token.
    pub fn context(&self) -> CancellationToken {
        self.channel.context()
    }

    /// Close the underlying channel. Counters are not reset.
    pub fn close(&self) {
        debug!(
            sent = self.send_count(),
            received = self.recv_count(),
            "closing noise socket"
        );
        self.channel.close();
    }

    /// Check if the underlying channel has shut down.
    pub fn is_closed(&self) -> bool {
        self.channel.context().is_cancelled()
    }

    /// Frames sealed or attempted so far.
    pub fn send_count(&self) -> u64 {
        self.write_counter.count()
    }

    /// Inbound frames processed so far, including ones that failed to decrypt.
    pub fn recv_count(&self) -> u64 {
        self.inbound.read_counter.count()
    }

    /// The wrapped channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }
}

impl<C> std::fmt::Debug for NoiseSocket<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseSocket")
            .field("send_count", &self.write_counter.count())
            .field("recv_count", &self.inbound.read_counter.count())
            .finish_non_exhaustive()
    }
}

/// Where a direction's cipher comes from.
enum CipherSource {
    /// Raw ChaCha20-Poly1305 key, zeroized on drop.
    Key(Zeroizing<[u8; AEAD_KEY_SIZE]>),
    /// Ready-made cipher.
    Cipher(Box<dyn FrameCipher>),
}

impl CipherSource {
    fn into_cipher(self) -> Result<Box<dyn FrameCipher>, CryptoError> {
        match self {
            CipherSource::Key(key) => Ok(Box::new(chacha20_poly1305(key.as_slice())?)),
            CipherSource::Cipher(cipher) => Ok(cipher),
        }
    }
}

/// Builder for [`NoiseSocket`].
///
/// Each direction takes either a raw 32-byte key (ChaCha20-Poly1305) or any
/// [`FrameCipher`].
#[derive(Default)]
pub struct NoiseSocketBuilder {
    write: Option<CipherSource>,
    read: Option<CipherSource>,
    on_frame: Option<PlaintextHandler>,
}

impl NoiseSocketBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the outbound key.
    pub fn write_key(mut self, key: [u8; AEAD_KEY_SIZE]) -> Self {
        self.write = Some(CipherSource::Key(Zeroizing::new(key)));
        self
    }

    /// Set the inbound key.
    pub fn read_key(mut self, key: [u8; AEAD_KEY_SIZE]) -> Self {
        self.read = Some(CipherSource::Key(Zeroizing::new(key)));
        self
    }

    /// Set the outbound cipher.
    pub fn write_cipher(mut self, cipher: impl FrameCipher + 'static) -> Self {
        self.write = Some(CipherSource::Cipher(Box::new(cipher)));
        self
    }

    /// Set the inbound cipher.
    pub fn read_cipher(mut self, cipher: impl FrameCipher + 'static) -> Self {
        self.read = Some(CipherSource::Cipher(Box::new(cipher)));
        self
    }

    /// Set the plaintext handler before the socket attaches to its channel.
    pub fn on_frame<F>(mut self, handler: F) -> Self
    where
        F: FnMut(Vec<u8>) + Send + 'static,
    {
        self.on_frame = Some(Box::new(handler));
        self
    }

    /// Attach to `channel` and return the socket.
    pub fn build<C: FrameChannel>(self, channel: C) -> Result<NoiseSocket<C>, CryptoError> {
        let write_key = self
            .write
            .ok_or(CryptoError::MissingCipher("write"))?
            .into_cipher()?;
        let read_key = self
            .read
            .ok_or(CryptoError::MissingCipher("read"))?
            .into_cipher()?;

        Ok(NoiseSocket::with_parts(
            channel,
            write_key,
            read_key,
            self.on_frame,
        ))
    }
}

impl std::fmt::Debug for NoiseSocketBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseSocketBuilder")
            .field("write", &self.write.is_some())
            .field("read", &self.read.is_some())
            .field("on_frame", &self.on_frame.is_some())
            .finish()
    }
}
