//! CLI command definitions for the `chatgate` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod commands;
pub mod run;
pub mod state;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use chatgate_infra::backend::console::{DEFAULT_SELF_ID, DEFAULT_SENDER_ID, DEFAULT_THREAD_ID};
use chatgate_infra::filesystem::DATA_DIR_ENV;

/// Chat-bot gateway: prefix commands, admin allow-list, persisted session state.
#[derive(Parser)]
#[command(name = "chatgate", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Data directory holding config.json, userData.json and commands/.
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    /// Template command directory [default: {data_dir}/commands].
    #[arg(long, global = true)]
    pub commands_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Connect to the console backend and process messages until EOF or Ctrl+C.
    Run(RunArgs),

    /// List registered commands.
    #[command(alias = "ls")]
    Commands,

    /// Print the persisted session state.
    State {
        /// Only print the value stored under this key.
        key: Option<String>,
    },
}

/// Options for `chatgate run`.
#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Host for the health endpoint.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port for the health endpoint.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Do not start the health endpoint.
    #[arg(long)]
    pub no_http: bool,

    /// Account id the bot answers as; messages from it are ignored.
    #[arg(long, default_value = DEFAULT_SELF_ID)]
    pub self_id: String,

    /// Sender id for console lines without an `@sender` prefix.
    #[arg(long, default_value = DEFAULT_SENDER_ID)]
    pub sender_id: String,

    /// Thread id for console messages.
    #[arg(long, default_value = DEFAULT_THREAD_ID)]
    pub thread_id: String,
}
