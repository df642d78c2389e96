//! Messaging backend adapters.
//!
//! Each adapter implements `ChatBackend` from `chatgate-core`.

pub mod console;

pub use console::{ConsoleBackend, ConsoleTransport};
