//! Commands compiled into the gateway.
//!
//! `BuiltinCommands` is the static loader strategy: it yields these commands
//! without touching the filesystem.

use chatgate_types::error::{CommandError, PluginLoadError};
use serde_json::{Value, json};

use super::{BoxCommand, Command, CommandContext};
use crate::registry::CommandSource;

/// Session state key under which `note` keeps per-sender notes.
pub const NOTES_KEY: &str = "notes";

/// Static table of the built-in commands.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinCommands;

impl CommandSource for BuiltinCommands {
    fn describe(&self) -> String {
        "builtin".to_string()
    }

    async fn load(&self) -> Vec<Result<BoxCommand, PluginLoadError>> {
        vec![
            Ok(BoxCommand::new(HelpCommand)),
            Ok(BoxCommand::new(PingCommand)),
            Ok(BoxCommand::new(PrefixCommand)),
            Ok(BoxCommand::new(NoteCommand)),
        ]
    }
}

/// `help [command]` -- list commands or describe one.
pub struct HelpCommand;

impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn description(&self) -> &str {
        "List available commands"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> Result<(), CommandError> {
        if ctx.args().len() > 1 {
            return Err(CommandError::InvalidArguments(format!(
                "Usage: {}help [command]",
                ctx.prefix
            )));
        }
        if let Some(wanted) = ctx.args().first() {
            let text = match ctx.registry.get(wanted) {
                Some(command) => describe_line(ctx.prefix, command),
                None => format!("Command not found: {}", wanted.to_lowercase()),
            };
            ctx.reply(&text).await;
            return Ok(());
        }

        let mut lines = vec![format!("Available commands (prefix: {}):", ctx.prefix)];
        lines.extend(ctx.registry.iter().map(|c| describe_line(ctx.prefix, c)));
        ctx.reply(&lines.join("\n")).await;
        Ok(())
    }
}

fn describe_line(prefix: &str, command: &BoxCommand) -> String {
    let name = command.name().to_lowercase();
    match command.description() {
        "" => format!("{prefix}{name}"),
        description => format!("{prefix}{name} - {description}"),
    }
}

/// `ping` -- liveness check from chat.
pub struct PingCommand;

impl Command for PingCommand {
    fn name(&self) -> &str {
        "ping"
    }

    fn description(&self) -> &str {
        "Check that the bot is responding"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> Result<(), CommandError> {
        ctx.reply("pong").await;
        Ok(())
    }
}

/// `prefix` -- report the command prefix.
///
/// Reachable without the prefix so users can discover it.
pub struct PrefixCommand;

impl Command for PrefixCommand {
    fn name(&self) -> &str {
        "prefix"
    }

    fn description(&self) -> &str {
        "Show the command prefix"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> Result<(), CommandError> {
        let text = format!(
            "My prefix is: {prefix}\nTry {prefix}help for a list of commands.",
            prefix = ctx.prefix
        );
        ctx.reply(&text).await;
        Ok(())
    }
}

/// `note [text|clear]` -- keep one note per sender in session state.
pub struct NoteCommand;

impl Command for NoteCommand {
    fn name(&self) -> &str {
        "note"
    }

    fn description(&self) -> &str {
        "Save, show or clear your personal note"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> Result<(), CommandError> {
        let sender = ctx.event.sender_id.clone();
        let text = ctx.rest();

        let reply = if text.is_empty() {
            match ctx
                .state
                .get(NOTES_KEY)
                .and_then(|notes| notes.get(&sender))
                .and_then(Value::as_str)
            {
                Some(note) => format!("Your note: {note}"),
                None => "You have no note saved.".to_string(),
            }
        } else if text.eq_ignore_ascii_case("clear") {
            if let Some(notes) = ctx.state.get_mut(NOTES_KEY).and_then(Value::as_object_mut) {
                notes.remove(&sender);
            }
            "Note cleared.".to_string()
        } else {
            let notes = ctx.state.entry_or_insert(NOTES_KEY, json!({}));
            let Some(notes) = notes.as_object_mut() else {
                return Err(CommandError::Internal(format!(
                    "session key '{NOTES_KEY}' is not an object"
                )));
            };
            notes.insert(sender, Value::String(text));
            "Note saved.".to_string()
        };

        ctx.reply(&reply).await;
        Ok(())
    }
}
