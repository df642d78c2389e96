//! Shared domain types for chatgate.
//!
//! Inbound events, gateway configuration, the shared session state object and
//! the error enums used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod event;
pub mod session;
