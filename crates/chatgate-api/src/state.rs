//! Application state wiring the gateway together.
//!
//! AppState resolves the data directory, loads `config.json` and builds the
//! command registry from the built-in table plus the manifest directory.
//! It pins the core's generic session store to the JSON file repository.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chatgate_core::command::builtin::BuiltinCommands;
use chatgate_core::registry::CommandRegistry;
use chatgate_core::session::SessionStore;
use chatgate_infra::commands::ManifestDirectory;
use chatgate_infra::config::load_bot_config;
use chatgate_infra::filesystem::{DataLayout, resolve_data_dir};
use chatgate_infra::session::JsonFileSessionRepository;
use chatgate_types::config::BotConfig;

/// Session store pinned to the on-disk repository.
pub type FileSessionStore = SessionStore<JsonFileSessionRepository>;

/// Shared application state used by every subcommand.
#[derive(Clone)]
pub struct AppState {
    pub layout: DataLayout,
    pub commands_dir: PathBuf,
    pub config: BotConfig,
    pub registry: Arc<CommandRegistry>,
}

impl AppState {
    /// Resolve paths, load config and build the command registry.
    ///
    /// Missing or malformed config and manifests degrade to defaults with a
    /// warning; only an unusable data directory is an error.
    pub async fn init(
        data_dir: Option<PathBuf>,
        commands_dir: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let layout = DataLayout::new(data_dir.unwrap_or_else(resolve_data_dir));
        layout
            .ensure()
            .await
            .with_context(|| format!("cannot create data directory {}", layout.root().display()))?;

        let config = load_bot_config(&layout.config_path()).await;
        let commands_dir = commands_dir.unwrap_or_else(|| layout.commands_dir());

        let mut registry = CommandRegistry::new();
        let builtin = registry.load_from(&BuiltinCommands).await;
        let templates = registry
            .load_from(&ManifestDirectory::new(&commands_dir))
            .await;

        tracing::info!(
            data_dir = %layout.root().display(),
            admins = config.admins.len(),
            builtin = builtin.loaded,
            templates = templates.loaded,
            skipped = templates.skipped,
            "application state initialized"
        );

        Ok(Self {
            layout,
            commands_dir,
            config,
            registry: Arc::new(registry),
        })
    }

    pub fn session_repository(&self) -> JsonFileSessionRepository {
        JsonFileSessionRepository::new(self.layout.session_path())
    }

    /// Load the persisted session state (empty on a missing/corrupt file).
    pub async fn open_sessions(&self) -> FileSessionStore {
        SessionStore::load(self.session_repository()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    #[tokio::test]
    async fn init_with_empty_data_dir_uses_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("data");

        let state = AppState::init(Some(root.clone()), None).await.unwrap();

        assert!(root.is_dir());
        assert_eq!(state.commands_dir, root.join("commands"));
        assert!(state.config.admins.is_empty());
        assert_eq!(state.config.command_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(state.registry.names(), vec!["help", "note", "ping", "prefix"]);
        assert!(state.open_sessions().await.state().is_empty());
    }

    #[tokio::test]
    async fn init_loads_config_and_manifests() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        tokio::fs::write(root.join("config.json"), r#"{"admins": ["42"]}"#)
            .await
            .unwrap();
        tokio::fs::create_dir(root.join("commands")).await.unwrap();
        tokio::fs::write(
            root.join("commands").join("hello.json"),
            r#"{"name": "Hello", "reply": "hi {sender}"}"#,
        )
        .await
        .unwrap();

        let state = AppState::init(Some(root.to_path_buf()), None).await.unwrap();

        assert!(state.config.admin_list().contains("42"));
        assert!(state.registry.contains("hello"));
        assert_eq!(state.registry.len(), 5);
    }
}
