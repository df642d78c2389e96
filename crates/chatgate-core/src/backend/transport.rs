//! ChatTransport trait and its object-safe wrapper.
//!
//! Same blanket-impl pattern as the command box:
//! 1. `ChatTransport` uses RPITIT and is what adapters implement
//! 2. `ChatTransportDyn` is the object-safe twin with boxed futures
//! 3. `BoxChatTransport` wraps `Box<dyn ChatTransportDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use chatgate_types::error::SendError;

/// Outbound half of a backend connection: delivers text to a thread.
///
/// Implementations live in chatgate-infra (e.g. `ConsoleTransport`).
pub trait ChatTransport: Send + Sync {
    /// Deliver `text` to `thread_id`.
    fn send_text(
        &self,
        thread_id: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), SendError>> + Send;
}

/// Object-safe version of [`ChatTransport`] with boxed futures.
pub trait ChatTransportDyn: Send + Sync {
    fn send_text_boxed<'a>(
        &'a self,
        thread_id: &'a str,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), SendError>> + Send + 'a>>;
}

impl<T: ChatTransport> ChatTransportDyn for T {
    fn send_text_boxed<'a>(
        &'a self,
        thread_id: &'a str,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), SendError>> + Send + 'a>> {
        Box::pin(self.send_text(thread_id, text))
    }
}

/// Type-erased transport so the sink does not carry the backend's type.
pub struct BoxChatTransport {
    inner: Box<dyn ChatTransportDyn + Send + Sync>,
}

impl BoxChatTransport {
    pub fn new<T: ChatTransport + 'static>(transport: T) -> Self {
        Self {
            inner: Box::new(transport),
        }
    }

    pub async fn send_text(&self, thread_id: &str, text: &str) -> Result<(), SendError> {
        self.inner.send_text_boxed(thread_id, text).await
    }
}

impl std::fmt::Debug for BoxChatTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxChatTransport").finish_non_exhaustive()
    }
}
