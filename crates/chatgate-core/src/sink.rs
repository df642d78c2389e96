//! Outbound message sink.
//!
//! `MessageSink` is the only send capability handed to commands. It drops
//! blank text before touching the transport and turns transport failures
//! into a log line, so a failed reply never aborts the caller.

use tracing::{debug, warn};

use crate::backend::BoxChatTransport;

/// What happened to one `send` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The transport accepted the text.
    Delivered,
    /// Text was empty or whitespace-only; the transport was not called.
    Skipped,
    /// The transport reported an error (already logged).
    Failed,
}

/// Send-to-destination capability shared by the dispatcher and commands.
#[derive(Debug)]
pub struct MessageSink {
    transport: BoxChatTransport,
}

impl MessageSink {
    pub fn new(transport: BoxChatTransport) -> Self {
        Self { transport }
    }

    /// Send `text` to `thread_id`.
    pub async fn send(&self, thread_id: &str, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            debug!(%thread_id, "skipping blank outbound message");
            return SendOutcome::Skipped;
        }

        match self.transport.send_text(thread_id, text).await {
            Ok(()) => SendOutcome::Delivered,
            Err(e) => {
                warn!(%thread_id, error = %e, "error sending message");
                SendOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingTransport;

    #[tokio::test]
    async fn whitespace_only_text_is_not_sent() {
        let transport = RecordingTransport::new();
        let sink = MessageSink::new(BoxChatTransport::new(transport.clone()));

        assert_eq!(sink.send("t1", "   ").await, SendOutcome::Skipped);
        assert_eq!(sink.send("t1", "").await, SendOutcome::Skipped);
        assert_eq!(sink.send("t1", "\n\t").await, SendOutcome::Skipped);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn text_is_sent_exactly_once() {
        let transport = RecordingTransport::new();
        let sink = MessageSink::new(BoxChatTransport::new(transport.clone()));

        assert_eq!(sink.send("t1", "hi").await, SendOutcome::Delivered);
        assert_eq!(transport.sent(), vec![("t1".to_string(), "hi".to_string())]);
    }

    #[tokio::test]
    async fn transport_failure_is_swallowed_and_later_sends_work() {
        let transport = RecordingTransport::new();
        transport.fail_next();
        let sink = MessageSink::new(BoxChatTransport::new(transport.clone()));

        assert_eq!(sink.send("t1", "first").await, SendOutcome::Failed);
        assert_eq!(sink.send("t1", "second").await, SendOutcome::Delivered);
        assert_eq!(transport.texts(), vec!["second".to_string()]);
    }
}
