//! The frame channel the socket runs on top of.
//!
//! A frame channel moves opaque byte blobs over a connection. It owns the
//! length-prefix framing, connection lifecycle and cancellation; the socket
//! only encrypts what goes in and decrypts what comes out.

use std::error::Error;
use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Callback invoked with each inbound frame.
///
/// `FnMut` because a channel MUST invoke it sequentially, never from two
/// places at once.
pub type FrameHandler = Box<dyn FnMut(Vec<u8>) + Send + 'static>;

/// An ordered, exactly-once, bidirectional frame transport.
///
/// # Requirements
///
/// - Inbound frames MUST reach the handler in the order the peer sent them
/// - Each frame MUST be delivered exactly once
/// - The handler MUST NOT be invoked concurrently
///
/// Counter nonces depend on all three; a channel that drops, duplicates or
/// reorders frames desynchronizes every frame that follows.
pub trait FrameChannel: Send + Sync + 'static {
    /// Error returned when a frame cannot be sent.
    type Error: Error + Send + Sync + 'static;

    /// Send one frame to the peer.
    fn send_frame(&self, frame: Vec<u8>) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Register the handler for inbound frames, replacing any previous one.
    fn set_frame_handler(&self, handler: FrameHandler);

    /// Token cancelled when the channel shuts down.
    fn context(&self) -> CancellationToken;

    /// Close the channel.
    fn close(&self);
}
