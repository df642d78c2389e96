//! JSON file session repository.
//!
//! Implements `SessionRepository` from `chatgate-core` on top of a single
//! pretty-printed JSON file. Writes go to a sibling temp file first and are
//! renamed into place, so a crash mid-write leaves the previous state intact.

use std::path::{Path, PathBuf};

use chatgate_core::session::SessionRepository;
use chatgate_types::error::StoreError;
use chatgate_types::session::SessionState;

/// Session state stored as one JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSessionRepository {
    path: PathBuf,
}

impl JsonFileSessionRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionRepository for JsonFileSessionRepository {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<Option<SessionState>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let state = serde_json::from_str::<SessionState>(&content)?;
        Ok(Some(state))
    }

    async fn save(&self, state: &SessionState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(state)?;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatgate_core::session::SessionStore;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let repo = JsonFileSessionRepository::new(dir.path().join("userData.json"));
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("userData.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let repo = JsonFileSessionRepository::new(&path);
        assert!(matches!(repo.load().await, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn non_object_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("userData.json");
        tokio::fs::write(&path, "[1, 2, 3]").await.unwrap();

        let repo = JsonFileSessionRepository::new(&path);
        assert!(repo.load().await.is_err());
    }

    #[tokio::test]
    async fn save_writes_pretty_json_and_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("userData.json");
        let repo = JsonFileSessionRepository::new(&path);

        let mut state = SessionState::new();
        state.set("100001", "x");
        state.set("notes", json!({"100001": "buy milk"}));
        repo.save(&state).await.unwrap();

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(raw.contains("\n  \"100001\": \"x\""));
        assert!(!dir.path().join("nested").join("userData.json.tmp").exists());

        assert_eq!(repo.load().await.unwrap(), Some(state));
    }

    #[tokio::test]
    async fn save_overwrites_previous_state() {
        let dir = tempdir().unwrap();
        let repo = JsonFileSessionRepository::new(dir.path().join("userData.json"));

        let mut state = SessionState::new();
        state.set("a", 1);
        repo.save(&state).await.unwrap();
        state.remove("a");
        state.set("b", 2);
        repo.save(&state).await.unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert!(!loaded.contains_key("a"));
        assert_eq!(loaded.get("b"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn store_starts_empty_on_corrupt_file_and_recovers_on_persist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("userData.json");
        tokio::fs::write(&path, "garbage").await.unwrap();

        let mut store = SessionStore::load(JsonFileSessionRepository::new(&path)).await;
        assert!(store.state().is_empty());

        store.state_mut().set("user-1", "x");
        store.persist().await.unwrap();

        let reloaded = SessionStore::load(JsonFileSessionRepository::new(&path)).await;
        assert_eq!(reloaded.state().get("user-1"), Some(&json!("x")));
    }
}
