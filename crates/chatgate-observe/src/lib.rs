//! Observability setup for chatgate: structured logging and optional
//! OpenTelemetry trace export.

pub mod tracing_setup;
