//! Infrastructure layer for chatgate.
//!
//! Contains implementations of the ports defined in `chatgate-core`: the JSON
//! file session repository, the JSON manifest command directory, the console
//! backend, plus config loading and data directory resolution.

pub mod backend;
pub mod commands;
pub mod config;
pub mod filesystem;
pub mod session;
