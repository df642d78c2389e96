//! HTTP liveness endpoint.
//!
//! The gateway exposes a single `GET /health` route; it shares no mutable
//! state with the message worker.

pub mod router;
