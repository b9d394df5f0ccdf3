//! Mock control channel for unit testing.
//!
//! # Why a mock channel?
//!
//! The real channel needs a TV (or at least a WebSocket server) on the other
//! end.  `MockControlChannel` replaces the socket with two in-memory queues:
//!
//! - **inbound** – frames the "TV" will deliver, in order, to `recv_text`.
//! - **sent** – every frame passed to `send_text`, with the instant it was
//!   sent, so tests can check ordering and pacing.
//!
//! The `sent` log is shared (`Arc<Mutex<...>>`) so a test can keep a handle
//! after moving the channel into a session.
//!
//! # Usage in tests
//!
//! ```ignore
//! let channel = MockControlChannel::with_handshake(r#"{"event":"ms.channel.connect"}"#);
//! let sent = channel.sent_log();
//! let mut session = RemoteSession::from_channel(Box::new(channel), Transport::Plain, None);
//! // ... drive the session ...
//! assert_eq!(sent.lock().unwrap().len(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use tokio::time::Instant;

use super::{ChannelError, ControlChannel};

/// One frame recorded by [`MockControlChannel::send_text`].
///
/// `at` is read from the Tokio clock so paused-time tests see exact gaps.
#[derive(Debug, Clone)]
pub struct SentFrame {
    /// When the frame was handed to the channel.
    pub at: Instant,
    /// Frame text.
    pub text: String,
}

/// Shared handle to the frames a mock channel has sent.
pub type SentLog = Arc<Mutex<Vec<SentFrame>>>;

/// An in-memory control channel.
#[derive(Default)]
pub struct MockControlChannel {
    /// Frames returned by `recv_text`, front first.  An empty queue reads as "closed".
    pub inbound: VecDeque<String>,
    /// Every frame sent so far.
    pub sent: SentLog,
    /// When `true`, `recv_text` never completes (simulates a silent TV).
    pub hang_on_recv: bool,
    /// When `true`, every `send_text` fails with [`ChannelError::Closed`].
    pub fail_sends: bool,
    /// Set by `close`.
    pub closed: Arc<Mutex<bool>>,
}

impl MockControlChannel {
    /// Creates a channel with nothing to deliver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a channel whose first inbound frame is `handshake`.
    pub fn with_handshake(handshake: impl Into<String>) -> Self {
        let mut channel = Self::new();
        channel.inbound.push_back(handshake.into());
        channel
    }

    /// Handle to the sent-frame log.
    pub fn sent_log(&self) -> SentLog {
        Arc::clone(&self.sent)
    }

    /// Handle to the closed flag.
    pub fn closed_flag(&self) -> Arc<Mutex<bool>> {
        Arc::clone(&self.closed)
    }

    fn is_closed(&self) -> bool {
        self.closed.lock().map(|c| *c).unwrap_or(true)
    }
}

#[async_trait]
impl ControlChannel for MockControlChannel {
    async fn send_text(&mut self, text: String) -> Result<(), ChannelError> {
        if self.fail_sends || self.is_closed() {
            return Err(ChannelError::Closed);
        }
        self.sent.lock().unwrap().push(SentFrame {
            at: Instant::now(),
            text,
        });
        Ok(())
    }

    async fn recv_text(&mut self) -> Result<Option<String>, ChannelError> {
        if self.hang_on_recv {
            std::future::pending::<()>().await;
        }
        Ok(self.inbound.pop_front())
    }

    async fn close(&mut self) -> Result<(), ChannelError> {
        *self.closed.lock().unwrap() = true;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_sent_frames_in_order() {
        // Arrange
        let mut channel = MockControlChannel::new();
        let log = channel.sent_log();

        // Act
        channel.send_text("a".into()).await.unwrap();
        channel.send_text("b".into()).await.unwrap();

        // Assert
        let texts: Vec<String> = log.lock().unwrap().iter().map(|f| f.text.clone()).collect();
        assert_eq!(texts, ["a", "b"]);
    }

    #[tokio::test]
    async fn test_mock_delivers_inbound_then_reports_closed() {
        let mut channel = MockControlChannel::with_handshake("hello");
        assert_eq!(channel.recv_text().await.unwrap().as_deref(), Some("hello"));
        assert_eq!(channel.recv_text().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_mock_send_fails_after_close() {
        let mut channel = MockControlChannel::new();
        channel.close().await.unwrap();
        assert!(matches!(channel.send_text("x".into()).await, Err(ChannelError::Closed)));
        assert!(*channel.closed_flag().lock().unwrap());
    }

    #[tokio::test]
    async fn test_mock_fail_sends_flag() {
        let mut channel = MockControlChannel {
            fail_sends: true,
            ..Default::default()
        };
        assert!(channel.send_text("x".into()).await.is_err());
        assert!(channel.sent_log().lock().unwrap().is_empty());
    }
}
