//! Messaging backend port.
//!
//! The backend is an external collaborator: it authenticates, tells us which
//! account id is "us", delivers inbound events as a stream and exposes an
//! outbound transport. Adapters live in chatgate-infra.

pub mod transport;

use std::future::Future;
use std::pin::Pin;

use chatgate_types::error::BackendError;
use chatgate_types::event::InboundEvent;
use futures_util::Stream;

pub use transport::{BoxChatTransport, ChatTransport};

/// Inbound event stream. Per-item errors are listen failures, not fatal.
pub type EventStream =
    Pin<Box<dyn Stream<Item = Result<InboundEvent, BackendError>> + Send + 'static>>;

/// An authenticated backend connection.
pub struct BackendSession {
    /// Account id of the bot itself; events from it are discarded.
    pub self_id: String,
    /// Outbound transport.
    pub transport: BoxChatTransport,
    /// Inbound events, in delivery order.
    pub events: EventStream,
}

impl std::fmt::Debug for BackendSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSession")
            .field("self_id", &self.self_id)
            .finish_non_exhaustive()
    }
}

/// A messaging backend that can be logged into.
pub trait ChatBackend: Send {
    /// Short backend name for logs (e.g. "console").
    fn name(&self) -> &str;

    /// Authenticate and open the event stream.
    ///
    /// An `Err` here is an auth failure and is fatal to the process.
    fn connect(self) -> impl Future<Output = Result<BackendSession, BackendError>> + Send;
}
