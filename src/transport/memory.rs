//! In-process frame channel.
//!
//! [`MemoryFrameChannel::pair`] returns two connected endpoints backed by
//! unbounded queues. Each endpoint pumps its inbound queue into the
//! registered handler from a single task, which gives the in-order,
//! exactly-once, sequential delivery the socket relies on.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::channel::{FrameChannel, FrameHandler};

/// Errors from the in-memory channel.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// This endpoint or its peer has been closed.
    #[error("frame channel closed")]
    Closed,
}

type HandlerSlot = Arc<Mutex<Option<FrameHandler>>>;

/// One endpoint of an in-process frame channel pair.
pub struct MemoryFrameChannel {
    /// Queue feeding the peer's inbound side.
    outbound: mpsc::UnboundedSender<Vec<u8>>,
    /// Our inbound queue, until the pump task takes it.
    inbound: Mutex<Option<mpsc::UnboundedReceiver<Vec<u8>>>>,
    /// Current frame handler.
    handler: HandlerSlot,
    /// Cancelled on close.
    cancel: CancellationToken,
}

impl MemoryFrameChannel {
    /// Create two connected endpoints.
    ///
    /// Frames sent on one are delivered to the other's handler. Frames that
    /// arrive before a handler is registered wait in the queue.
    pub fn pair() -> (Self, Self) {
        let (to_first, first_inbound) = mpsc::unbounded_channel();
        let (to_second, second_inbound) = mpsc::unbounded_channel();

        (
            Self::new(to_second, first_inbound),
            Self::new(to_first, second_inbound),
        )
    }

    fn new(
        outbound: mpsc::UnboundedSender<Vec<u8>>,
        inbound: mpsc::UnboundedReceiver<Vec<u8>>,
    ) -> Self {
        Self {
            outbound,
            inbound: Mutex::new(Some(inbound)),
            handler: Arc::new(Mutex::new(None)),
            cancel: CancellationToken::new(),
        }
    }

    /// Check if this endpoint has been closed.
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Start delivering queued frames. Only the first call spawns a task.
    fn start_pump(&self) {
        let Some(mut inbound) = self.inbound.lock().take() else {
            return;
        };
        let slot = Arc::clone(&self.handler);
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            loop {
                let frame = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    frame = inbound.recv() => match frame {
                        Some(frame) => frame,
                        None => break,
                    },
                };

                trace!(len = frame.len(), "delivering frame");
                if let Some(handler) = slot.lock().as_mut() {
                    handler(frame);
                }
            }
            debug!("memory frame channel pump stopped");
        });
    }
}

impl FrameChannel for MemoryFrameChannel {
    type Error = ChannelError;

    async fn send_frame(&self, frame: Vec<u8>) -> Result<(), ChannelError> {
        if self.cancel.is_cancelled() {
            return Err(ChannelError::Closed);
        }
        self.outbound.send(frame).map_err(|_| ChannelError::Closed)
    }

    /// Register the inbound handler.
    ///
    /// # Panics
    ///
    /// The first registration spawns the delivery task and panics if called
    /// outside a Tokio runtime.
    fn set_frame_handler(&self, handler: FrameHandler) {
        *self.handler.lock() = Some(handler);
        if !self.cancel.is_cancelled() {
            self.start_pump();
        }
    }

    fn context(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn close(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        // Drop the queue if the pump never started so the peer sees the close.
        self.inbound.lock().take();
        debug!("memory frame channel closed");
    }
}

impl std::fmt::Debug for MemoryFrameChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryFrameChannel")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    fn forward_to(tx: mpsc::UnboundedSender<Vec<u8>>) -> FrameHandler {
        Box::new(move |frame: Vec<u8>| {
            let _ = tx.send(frame);
        })
    }

    #[tokio::test]
    async fn test_pair_delivers_in_order() {
        let (a, b) = MemoryFrameChannel::pair();
        let (tx, mut rx) = mpsc::unbounded_channel();
        b.set_frame_handler(forward_to(tx));

        for i in 0u8..20 {
            a.send_frame(vec![i]).await.unwrap();
        }

        for i in 0u8..20 {
            let frame = timeout(Duration::from_secs(1), rx.recv())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(frame, vec![i]);
        }
    }

    #[tokio::test]
    async fn test_frames_queue_until_handler_registered() {
        let (a, b) = MemoryFrameChannel::pair();
        a.send_frame(b"early".to_vec()).await.unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        b.set_frame_handler(forward_to(tx));

        let frame = timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(frame, b"early");
    }

    #[tokio::test]
    async fn test_send_after_close_fails() {
        let (a, _b) = MemoryFrameChannel::pair();
        a.close();

        assert!(a.is_closed());
        assert!(a.context().is_cancelled());
        assert_eq!(a.send_frame(vec![1]).await, Err(ChannelError::Closed));

        // Idempotent
        a.close();
        assert!(a.is_closed());
    }

    #[tokio::test]
    async fn test_send_to_closed_peer_fails() {
        let (a, b) = MemoryFrameChannel::pair();
        b.close();

        assert_eq!(a.send_frame(vec![1]).await, Err(ChannelError::Closed));
        assert!(!a.is_closed());
    }
}
