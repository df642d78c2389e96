//! chatgate CLI entry point.
//!
//! Binary name: `chatgate`
//!
//! Parses CLI arguments, initializes tracing and application state, then
//! dispatches to the selected subcommand.

mod cli;
mod http;
mod state;

use clap::Parser;

use chatgate_observe::tracing_setup::{
    TracingOptions, init_tracing, shutdown_tracing, verbosity_filter,
};
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let tracing_options = TracingOptions::new(verbosity_filter(cli.verbose, cli.quiet))
        .json(cli.json)
        .otel(cli.otel);
    init_tracing(&tracing_options)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = dispatch(cli).await;

    shutdown_tracing();
    result
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init(cli.data_dir, cli.commands_dir).await?;

    match cli.command {
        Commands::Run(args) => cli::run::run(&state, args, cli.json, shutdown_signal()).await,
        Commands::Commands => cli::commands::list_commands(&state, cli.json),
        Commands::State { key } => cli::state::show_state(&state, key.as_deref(), cli.json).await,
    }
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
