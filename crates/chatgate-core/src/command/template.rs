//! Reply-template commands.
//!
//! A `CommandManifest` is the file-per-command plugin format: a name, an
//! optional description and a reply template. Placeholders in the template
//! are filled from the invocation:
//!
//! | placeholder | value                               |
//! |-------------|-------------------------------------|
//! | `{sender}`  | sender id                           |
//! | `{thread}`  | thread id                           |
//! | `{args}`    | arguments joined with single spaces |
//! | `{prefix}`  | command prefix                      |
//! | `{name}`    | command name                        |
//! | `{bot}`     | the bot's own account id            |

use chatgate_types::error::{CommandError, PluginLoadError};
use serde::{Deserialize, Serialize};

use super::{Command, CommandContext};

/// On-disk description of one template command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reply: Option<String>,
    /// Restrict the command to senders on the admin list.
    #[serde(default)]
    pub admin_only: bool,
}

/// A command that answers with a rendered template.
#[derive(Debug, Clone)]
pub struct TemplateCommand {
    name: String,
    description: String,
    reply: String,
    admin_only: bool,
}

impl TemplateCommand {
    /// Validate a manifest read from `unit` (a file name, for errors).
    pub fn from_manifest(unit: &str, manifest: CommandManifest) -> Result<Self, PluginLoadError> {
        let name = manifest
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| PluginLoadError::MissingName {
                unit: unit.to_string(),
            })?;

        if name.chars().any(char::is_whitespace) {
            return Err(PluginLoadError::Invalid {
                unit: unit.to_string(),
                reason: format!("name '{name}' contains whitespace"),
            });
        }

        let reply = manifest
            .reply
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| PluginLoadError::Invalid {
                unit: unit.to_string(),
                reason: "missing 'reply' template".to_string(),
            })?;

        Ok(Self {
            name,
            description: manifest.description.unwrap_or_default(),
            reply,
            admin_only: manifest.admin_only,
        })
    }

    fn render(&self, ctx: &CommandContext<'_>) -> String {
        self.reply
            .replace("{sender}", &ctx.event.sender_id)
            .replace("{thread}", &ctx.event.thread_id)
            .replace("{args}", &ctx.rest())
            .replace("{prefix}", ctx.prefix)
            .replace("{name}", &self.name.to_lowercase())
            .replace("{bot}", ctx.self_id)
    }
}

impl Command for TemplateCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> Result<(), CommandError> {
        if self.admin_only && !ctx.is_admin() {
            return Err(CommandError::PermissionDenied);
        }
        let text = self.render(&ctx);
        ctx.reply(&text).await;
        Ok(())
    }
}
