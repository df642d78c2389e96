//! Inbound message dispatcher.
//!
//! The `Dispatcher` turns one `InboundEvent` into at most one command
//! invocation, converts any failure into a chat reply and persists the
//! session state once the event has been routed. It never returns an error:
//! every outcome is reported as a `DispatchOutcome`.

pub mod resolve;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chatgate_types::config::AdminList;
use chatgate_types::error::CommandError;
use chatgate_types::event::InboundEvent;
use futures_util::FutureExt;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info_span, warn};

use crate::command::{BoxCommand, CommandContext};
use crate::registry::CommandRegistry;
use crate::session::{SessionRepository, SessionStore};
use crate::sink::MessageSink;

pub use resolve::{PREFIX_COMMAND, Route, resolve};

/// Default command prefix.
pub const DEFAULT_PREFIX: &str = "/";

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Not a `message` event; dropped without persisting.
    NotAMessage,
    /// Sent by the bot itself; dropped before resolution.
    SelfMessage,
    /// Plain text from a non-admin.
    Ignored,
    /// A command ran to completion.
    Executed { command: String },
    /// A command failed; the user got an error reply.
    Failed { command: String, kind: &'static str },
    /// Prefixed text naming no registered command.
    NotFound { name: String },
    /// Non-command text from an admin. `handled` is false when no admin
    /// hook is installed.
    AdminText { handled: bool },
}

/// Routes inbound events to commands, one at a time.
pub struct Dispatcher<R> {
    self_id: String,
    prefix: String,
    registry: Arc<CommandRegistry>,
    admins: AdminList,
    sessions: SessionStore<R>,
    sink: MessageSink,
    admin_hook: Option<Arc<BoxCommand>>,
    command_timeout: Option<Duration>,
    cancel: CancellationToken,
    persist_failures: usize,
}

impl<R: SessionRepository> Dispatcher<R> {
    /// Create a dispatcher with the default prefix, no admins, no timeout.
    pub fn new(
        self_id: impl Into<String>,
        registry: Arc<CommandRegistry>,
        sessions: SessionStore<R>,
        sink: MessageSink,
    ) -> Self {
        Self {
            self_id: self_id.into(),
            prefix: DEFAULT_PREFIX.to_string(),
            registry,
            admins: AdminList::default(),
            sessions,
            sink,
            admin_hook: None,
            command_timeout: None,
            cancel: CancellationToken::new(),
            persist_failures: 0,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_admins(mut self, admins: AdminList) -> Self {
        self.admins = admins;
        self
    }

    /// Install a handler for non-command text sent by admins.
    pub fn with_admin_hook(mut self, hook: BoxCommand) -> Self {
        self.admin_hook = Some(Arc::new(hook));
        self
    }

    /// Bound every invocation. `None` lets commands run indefinitely.
    pub fn with_command_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Abort in-flight commands when `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn sessions(&self) -> &SessionStore<R> {
        &self.sessions
    }

    /// Routed messages whose session state could not be saved.
    pub fn persist_failures(&self) -> usize {
        self.persist_failures
    }

    /// Handle one inbound event.
    pub async fn handle(&mut self, event: &InboundEvent) -> DispatchOutcome {
        if !event.is_message() {
            debug!(kind = %event.kind, "ignoring non-message event");
            return DispatchOutcome::NotAMessage;
        }
        if event.sender_id == self.self_id {
            debug!(event_id = %event.id, "ignoring message from self");
            return DispatchOutcome::SelfMessage;
        }

        let span = info_span!(
            "chat.event",
            event_id = %event.id,
            sender_id = %event.sender_id,
            thread_id = %event.thread_id,
        );

        async {
            let outcome = self.route(event).await;
            debug!(?outcome, "event routed");
            if let Err(e) = self.sessions.persist().await {
                debug!(error = %e, "session state not persisted");
                self.persist_failures += 1;
            }
            outcome
        }
        .instrument(span)
        .await
    }

    async fn route(&mut self, event: &InboundEvent) -> DispatchOutcome {
        let is_admin = self.admins.contains(&event.sender_id);
        let has_prefix_command = self.registry.contains(PREFIX_COMMAND);

        match resolve(&event.body, &self.prefix, has_prefix_command, is_admin) {
            Route::PrefixBypass { words } => self.invoke(PREFIX_COMMAND, event, &words).await,
            Route::Command { name, words } => self.invoke(&name, event, &words).await,
            Route::AdminText { words } => {
                let Some(hook) = self.admin_hook.clone() else {
                    return DispatchOutcome::AdminText { handled: false };
                };
                let registry = Arc::clone(&self.registry);
                match self.run(&hook, &registry, event, &words).await {
                    Ok(()) => DispatchOutcome::AdminText { handled: true },
                    Err(e) => self.report_failure(hook.name(), event, e).await,
                }
            }
            Route::Ignore => DispatchOutcome::Ignored,
        }
    }

    /// Look `name` up and run it, replying on failure or absence.
    async fn invoke(&mut self, name: &str, event: &InboundEvent, words: &[String]) -> DispatchOutcome {
        let registry = Arc::clone(&self.registry);
        let Some(command) = registry.get(name) else {
            self.sink
                .send(&event.thread_id, &format!("Command not found: {name}"))
                .await;
            return DispatchOutcome::NotFound {
                name: name.to_string(),
            };
        };

        let command_name = command.name().to_lowercase();
        match self.run(command, &registry, event, words).await {
            Ok(()) => DispatchOutcome::Executed {
                command: command_name,
            },
            Err(e) => self.report_failure(&command_name, event, e).await,
        }
    }

    /// Execute `command` under the panic guard, timeout and cancellation.
    async fn run(
        &mut self,
        command: &BoxCommand,
        registry: &CommandRegistry,
        event: &InboundEvent,
        words: &[String],
    ) -> Result<(), CommandError> {
        debug!(command = %command.name(), args = words.len().saturating_sub(1), "invoking command");

        let timeout = self.command_timeout;
        let cancel = self.cancel.clone();
        let ctx = CommandContext {
            self_id: &self.self_id,
            event,
            words,
            registry,
            prefix: &self.prefix,
            admins: &self.admins,
            state: self.sessions.state_mut(),
            sink: &self.sink,
        };

        let guarded = AssertUnwindSafe(command.execute(ctx))
            .catch_unwind()
            .map(|caught| caught.unwrap_or_else(|payload| Err(CommandError::Panicked(panic_message(&*payload)))));

        let bounded = async move {
            match timeout {
                Some(limit) => tokio::time::timeout(limit, guarded)
                    .await
                    .unwrap_or(Err(CommandError::Timeout(limit))),
                None => guarded.await,
            }
        };

        tokio::select! {
            result = bounded => result,
            () = cancel.cancelled() => Err(CommandError::Cancelled),
        }
    }

    async fn report_failure(
        &self,
        command: &str,
        event: &InboundEvent,
        err: CommandError,
    ) -> DispatchOutcome {
        match &err {
            CommandError::Panicked(_) | CommandError::Internal(_) => {
                error!(%command, kind = err.kind(), error = %err, "command failed");
            }
            _ => warn!(%command, kind = err.kind(), error = %err, "command failed"),
        }

        self.sink
            .send(
                &event.thread_id,
                &format!("Error executing command: {}", err.user_message()),
            )
            .await;

        DispatchOutcome::Failed {
            command: command.to_string(),
            kind: err.kind(),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl<R> std::fmt::Debug for Dispatcher<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("self_id", &self.self_id)
            .field("prefix", &self.prefix)
            .field("commands", &self.registry.len())
            .field("admins", &self.admins.len())
            .field("command_timeout", &self.command_timeout)
            .field("persist_failures", &self.persist_failures)
            .finish_non_exhaustive()
    }
}
