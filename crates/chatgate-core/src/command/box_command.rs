//! BoxCommand -- object-safe dynamic dispatch wrapper for Command.
//!
//! 1. Define an object-safe `CommandDyn` trait with boxed futures
//! 2. Blanket-impl `CommandDyn` for all `T: Command`
//! 3. `BoxCommand` wraps `Box<dyn CommandDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use chatgate_types::error::CommandError;

use super::{Command, CommandContext};

/// Object-safe version of [`Command`] with a boxed future.
pub trait CommandDyn: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn execute_boxed<'a>(
        &'a self,
        ctx: CommandContext<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<(), CommandError>> + Send + 'a>>;
}

impl<T: Command> CommandDyn for T {
    fn name(&self) -> &str {
        Command::name(self)
    }

    fn description(&self) -> &str {
        Command::description(self)
    }

    fn execute_boxed<'a>(
        &'a self,
        ctx: CommandContext<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<(), CommandError>> + Send + 'a>> {
        Box::pin(self.execute(ctx))
    }
}

/// Type-erased command, as stored in the registry.
///
/// Since `Command` uses RPITIT it cannot be a trait object directly.
pub struct BoxCommand {
    inner: Box<dyn CommandDyn + Send + Sync>,
}

impl BoxCommand {
    pub fn new<T: Command + 'static>(command: T) -> Self {
        Self {
            inner: Box::new(command),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn description(&self) -> &str {
        self.inner.description()
    }

    pub async fn execute(&self, ctx: CommandContext<'_>) -> Result<(), CommandError> {
        self.inner.execute_boxed(ctx).await
    }
}

impl std::fmt::Debug for BoxCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxCommand")
            .field("name", &self.name())
            .finish()
    }
}
