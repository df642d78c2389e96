//! Command trait and invocation context.
//!
//! - `Command` -- the contract every command implements (RPITIT)
//! - `box_command` -- `BoxCommand`, the object-safe wrapper the registry stores
//! - `builtin` -- commands compiled into the gateway (`help`, `ping`, ...)
//! - `template` -- reply-template commands described by JSON manifests

pub mod box_command;
pub mod builtin;
pub mod template;

use std::future::Future;

use chatgate_types::config::AdminList;
use chatgate_types::error::CommandError;
use chatgate_types::event::InboundEvent;
use chatgate_types::session::SessionState;

use crate::registry::CommandRegistry;
use crate::sink::{MessageSink, SendOutcome};

pub use box_command::BoxCommand;

/// A chat command, addressed by a case-insensitive name.
///
/// Commands run one at a time, so `execute` may read-modify-write
/// `ctx.state` without extra locking.
pub trait Command: Send + Sync {
    /// Name the command is invoked by. Matched case-insensitively.
    fn name(&self) -> &str;

    /// One-line description shown by `help`.
    fn description(&self) -> &str {
        ""
    }

    /// Run the command.
    ///
    /// An `Err` is rendered into a chat reply by the dispatcher; it never
    /// stops the event loop.
    fn execute(
        &self,
        ctx: CommandContext<'_>,
    ) -> impl Future<Output = Result<(), CommandError>> + Send;
}

/// Everything a command receives for one invocation.
pub struct CommandContext<'a> {
    /// Account id of the bot (the authenticated connection).
    pub self_id: &'a str,
    /// The event that triggered this invocation.
    pub event: &'a InboundEvent,
    /// Whitespace-split message words, invocation token first.
    pub words: &'a [String],
    /// All registered commands.
    pub registry: &'a CommandRegistry,
    /// Command prefix in effect (e.g. `/`).
    pub prefix: &'a str,
    /// Privileged sender ids.
    pub admins: &'a AdminList,
    /// Shared session state. Persisted by the dispatcher after the event.
    pub state: &'a mut SessionState,
    /// Send capability.
    pub sink: &'a MessageSink,
}

impl CommandContext<'_> {
    /// Words after the invocation token.
    pub fn args(&self) -> &[String] {
        self.words.get(1..).unwrap_or(&[])
    }

    /// Arguments joined back with single spaces.
    pub fn rest(&self) -> String {
        self.args().join(" ")
    }

    pub fn sender_id(&self) -> &str {
        &self.event.sender_id
    }

    pub fn thread_id(&self) -> &str {
        &self.event.thread_id
    }

    pub fn is_admin(&self) -> bool {
        self.admins.contains(&self.event.sender_id)
    }

    /// Reply in the thread the event came from.
    pub async fn reply(&self, text: &str) -> SendOutcome {
        self.sink.send(&self.event.thread_id, text).await
    }
}

impl std::fmt::Debug for CommandContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("event_id", &self.event.id)
            .field("sender_id", &self.event.sender_id)
            .field("words", &self.words)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
