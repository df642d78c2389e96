//! `chatgate run` -- the gateway itself.
//!
//! Logs into the backend, starts the health listener and drives the
//! single-worker event loop until the backend stream ends or shutdown is
//! requested.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;
use tokio_util::sync::CancellationToken;

use chatgate_core::backend::{BackendSession, ChatBackend};
use chatgate_core::dispatch::Dispatcher;
use chatgate_core::sink::MessageSink;
use chatgate_core::worker::{WorkerStats, serve};
use chatgate_infra::backend::ConsoleBackend;

use crate::cli::RunArgs;
use crate::http::router::{HealthState, build_router};
use crate::state::AppState;

/// Run the gateway on the console backend.
///
/// A backend login failure is returned as an error and is fatal; everything
/// after login is recovered inside the worker.
pub async fn run(
    state: &AppState,
    args: RunArgs,
    json: bool,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let backend = ConsoleBackend::stdio()
        .with_self_id(&args.self_id)
        .with_sender_id(&args.sender_id)
        .with_thread_id(&args.thread_id);
    let backend_name = backend.name().to_string();

    let session = backend
        .connect()
        .await
        .with_context(|| format!("{backend_name} backend login failed"))?;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            shutdown.await;
            tracing::info!("shutdown requested");
            cancel.cancel();
        });
    }

    let http = if args.no_http {
        None
    } else {
        let addr = format!("{}:{}", args.host, args.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("cannot bind health endpoint on {addr}"))?;
        let router = build_router(HealthState {
            commands: state.registry.len(),
        });
        let stop = cancel.clone();
        tracing::info!(%addr, "health endpoint listening");
        Some(tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(stop.cancelled_owned())
                .await
        }))
    };

    let stats = run_session(state, session, cancel.clone()).await;

    // The backend stream may end on its own (EOF); stop the listener too.
    cancel.cancel();
    if let Some(handle) = http {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "health endpoint stopped with error"),
            Err(e) => tracing::warn!(error = %e, "health endpoint task failed"),
        }
    }

    print_summary(&stats, json)?;
    Ok(())
}

/// Wire a dispatcher to an open backend session and drain its events.
async fn run_session(
    state: &AppState,
    session: BackendSession,
    cancel: CancellationToken,
) -> WorkerStats {
    let BackendSession {
        self_id,
        transport,
        events,
    } = session;

    let dispatcher = Dispatcher::new(
        self_id,
        Arc::clone(&state.registry),
        state.open_sessions().await,
        MessageSink::new(transport),
    )
    .with_admins(state.config.admin_list())
    .with_command_timeout(state.config.command_timeout())
    .with_cancellation(cancel.clone());

    tracing::debug!(?dispatcher, "dispatcher ready");

    let (stats, _) = serve(events, dispatcher, cancel).await;
    stats
}

fn print_summary(stats: &WorkerStats, json: bool) -> Result<()> {
    if json {
        let summary = serde_json::json!({
            "received": stats.received,
            "executed": stats.executed,
            "failed": stats.failed,
            "not_found": stats.not_found,
            "ignored": stats.ignored,
            "persist_failures": stats.persist_failures,
        });
        eprintln!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    eprintln!();
    eprintln!("  {}", style("── Session ──").dim());
    eprintln!("  Messages:  {}", style(stats.received).bold());
    eprintln!("  Executed:  {}", style(stats.executed).green());
    if stats.failed > 0 {
        eprintln!("  Failed:    {}", style(stats.failed).red());
    }
    if stats.not_found > 0 {
        eprintln!("  Not found: {}", style(stats.not_found).yellow());
    }
    if stats.persist_failures > 0 {
        eprintln!("  Unsaved:   {}", style(stats.persist_failures).red());
    }
    eprintln!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn console_session_round_trip() {
        let dir = tempdir().unwrap();
        tokio::fs::write(dir.path().join("config.json"), r#"{"admins": ["boss"]}"#)
            .await
            .unwrap();
        let state = AppState::init(Some(dir.path().to_path_buf()), None).await.unwrap();

        let input: &[u8] = b"/ping\n/note Remember This\n/nope\n@chatgate /ping\nprefix\n";
        let session = ConsoleBackend::new(input, Vec::<u8>::new())
            .with_sender_id("alice")
            .connect()
            .await
            .unwrap();

        let stats = run_session(&state, session, CancellationToken::new()).await;

        assert_eq!(stats.received, 5);
        assert_eq!(stats.executed, 3);
        assert_eq!(stats.not_found, 1);
        assert_eq!(stats.ignored, 1);
        assert_eq!(stats.persist_failures, 0);

        let saved = state.open_sessions().await;
        assert_eq!(
            saved.state().get("notes"),
            Some(&json!({"alice": "Remember This"}))
        );
    }

    #[tokio::test]
    async fn blank_self_id_is_fatal() {
        use chatgate_types::error::BackendError;

        let input: &[u8] = b"";
        let err = ConsoleBackend::new(input, Vec::<u8>::new())
            .with_self_id("")
            .connect()
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::AuthFailed(_)));
    }
}
