//! Command registry and loader strategies.
//!
//! The registry is a lowercased-name index of boxed commands, built once at
//! startup from one or more `CommandSource`s and shared read-only afterwards.

use std::collections::HashMap;
use std::future::Future;

use chatgate_types::error::PluginLoadError;
use tracing::{debug, info, warn};

use crate::command::BoxCommand;

/// A strategy for producing commands at startup (static table, directory
/// scan, ...).
///
/// Each unit either yields a command or a load error. Errors are logged and
/// skipped by the registry; they never abort the load.
pub trait CommandSource: Send + Sync {
    /// Human-readable description for logs (e.g. a directory path).
    fn describe(&self) -> String;

    /// Produce all units, in enumeration order.
    fn load(&self) -> impl Future<Output = Vec<Result<BoxCommand, PluginLoadError>>> + Send;
}

/// Summary of one `load_from` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Units registered.
    pub loaded: usize,
    /// Units skipped because of a load error.
    pub skipped: usize,
    /// Registrations that replaced an existing name.
    pub replaced: usize,
}

/// Case-insensitive index of commands.
pub struct CommandRegistry {
    commands: HashMap<String, BoxCommand>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register a command under its lowercased name.
    ///
    /// A name that is already taken is replaced (last registration wins) and
    /// the earlier command is returned.
    pub fn register(&mut self, command: BoxCommand) -> Option<BoxCommand> {
        let key = command.name().to_lowercase();
        let later = command.name().to_string();
        let previous = self.commands.insert(key, command);
        if let Some(ref earlier) = previous {
            warn!(
                earlier = %earlier.name(),
                later = %later,
                "duplicate command name; the later registration replaces the earlier one"
            );
        }
        previous
    }

    /// Register every unit a source yields, skipping the ones that fail.
    pub async fn load_from<S: CommandSource>(&mut self, source: &S) -> LoadReport {
        let mut report = LoadReport::default();
        let origin = source.describe();

        for unit in source.load().await {
            match unit {
                Ok(command) if command.name().trim().is_empty() => {
                    warn!(%origin, "command with blank name skipped");
                    report.skipped += 1;
                }
                Ok(command) => {
                    debug!(%origin, command = %command.name(), "command loaded");
                    if self.register(command).is_some() {
                        report.replaced += 1;
                    }
                    report.loaded += 1;
                }
                Err(e) => {
                    warn!(%origin, error = %e, "error loading command, skipped");
                    report.skipped += 1;
                }
            }
        }

        info!(
            %origin,
            loaded = report.loaded,
            skipped = report.skipped,
            replaced = report.replaced,
            "commands loaded"
        );
        report
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&BoxCommand> {
        self.commands.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(&name.to_lowercase())
    }

    /// Registered (lowercased) names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Commands in name order.
    pub fn iter(&self) -> impl Iterator<Item = &BoxCommand> {
        self.names()
            .into_iter()
            .filter_map(|name| self.commands.get(name))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names())
            .finish()
    }
}
