//! Command dispatch and session core for chatgate.
//!
//! This crate defines the ports (`ChatBackend`, `ChatTransport`,
//! `SessionRepository`, `CommandSource`) that the infrastructure layer
//! implements. It depends only on `chatgate-types` -- never on
//! `chatgate-infra` or any filesystem/network adapter.

pub mod backend;
pub mod command;
pub mod dispatch;
pub mod registry;
pub mod session;
pub mod sink;
pub mod worker;

#[cfg(test)]
mod test_support;
