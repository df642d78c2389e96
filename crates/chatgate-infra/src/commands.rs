//! Directory-scanned command source.
//!
//! `ManifestDirectory` reads every `*.json` file directly under a directory
//! (non-recursive) as a `CommandManifest` and turns it into a
//! `TemplateCommand`. Files are enumerated in file-name order, which makes
//! the registry's last-wins collision rule deterministic.

use std::path::{Path, PathBuf};

use chatgate_core::command::BoxCommand;
use chatgate_core::command::template::{CommandManifest, TemplateCommand};
use chatgate_core::registry::CommandSource;
use chatgate_types::error::PluginLoadError;

/// A directory of JSON command manifests.
#[derive(Debug, Clone)]
pub struct ManifestDirectory {
    dir: PathBuf,
}

impl ManifestDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Manifest files in file-name order.
    async fn manifest_paths(&self) -> Result<Vec<PathBuf>, std::io::Error> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_json = path.extension().is_some_and(|ext| ext == "json");
            if is_json && entry.file_type().await?.is_file() {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }
}

async fn load_unit(path: &Path) -> Result<BoxCommand, PluginLoadError> {
    let unit = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| PluginLoadError::Invalid {
            unit: unit.clone(),
            reason: e.to_string(),
        })?;

    let manifest: CommandManifest =
        serde_json::from_str(&content).map_err(|e| PluginLoadError::Invalid {
            unit: unit.clone(),
            reason: e.to_string(),
        })?;

    let command = TemplateCommand::from_manifest(&unit, manifest)?;
    Ok(BoxCommand::new(command))
}

impl CommandSource for ManifestDirectory {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    async fn load(&self) -> Vec<Result<BoxCommand, PluginLoadError>> {
        let paths = match self.manifest_paths().await {
            Ok(paths) => paths,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(dir = %self.dir.display(), "command directory not found, no template commands loaded");
                return Vec::new();
            }
            Err(err) => {
                tracing::warn!(dir = %self.dir.display(), error = %err, "failed to read command directory");
                return Vec::new();
            }
        };

        let mut units = Vec::with_capacity(paths.len());
        for path in &paths {
            units.push(load_unit(path).await);
        }
        units
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatgate_core::registry::CommandRegistry;
    use tempfile::tempdir;

    async fn write(dir: &Path, name: &str, body: &str) {
        tokio::fs::write(dir.join(name), body).await.unwrap();
    }

    #[tokio::test]
    async fn missing_directory_yields_nothing() {
        let dir = tempdir().unwrap();
        let source = ManifestDirectory::new(dir.path().join("absent"));
        assert!(source.load().await.is_empty());
    }

    #[tokio::test]
    async fn loads_json_manifests_in_file_name_order() {
        let dir = tempdir().unwrap();
        write(dir.path(), "b.json", r#"{"name": "Bravo", "reply": "b"}"#).await;
        write(dir.path(), "a.json", r#"{"name": "alpha", "reply": "a"}"#).await;
        write(dir.path(), "notes.txt", "ignored").await;
        tokio::fs::create_dir(dir.path().join("sub.json")).await.unwrap();

        let units = ManifestDirectory::new(dir.path()).load().await;
        let names: Vec<String> = units
            .into_iter()
            .map(|u| u.unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["alpha", "Bravo"]);
    }

    #[tokio::test]
    async fn bad_units_are_reported_not_fatal() {
        let dir = tempdir().unwrap();
        write(dir.path(), "1-broken.json", "{ nope").await;
        write(dir.path(), "2-nameless.json", r#"{"reply": "hi"}"#).await;
        write(dir.path(), "3-good.json", r#"{"name": "hello", "reply": "hi {sender}"}"#).await;

        let units = ManifestDirectory::new(dir.path()).load().await;
        assert_eq!(units.len(), 3);
        assert!(matches!(units[0], Err(PluginLoadError::Invalid { ref unit, .. }) if unit == "1-broken.json"));
        assert!(matches!(units[1], Err(PluginLoadError::MissingName { .. })));
        assert!(units[2].is_ok());

        let mut registry = CommandRegistry::new();
        let report = registry.load_from(&ManifestDirectory::new(dir.path())).await;
        assert_eq!(report.loaded, 1);
        assert_eq!(report.skipped, 2);
        assert!(registry.contains("HELLO"));
    }

    #[tokio::test]
    async fn later_file_wins_on_name_collision() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.json", r#"{"name": "greet", "description": "first", "reply": "1"}"#).await;
        write(dir.path(), "b.json", r#"{"name": "GREET", "description": "second", "reply": "2"}"#).await;

        let mut registry = CommandRegistry::new();
        let report = registry.load_from(&ManifestDirectory::new(dir.path())).await;

        assert_eq!(report.replaced, 1);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("greet").unwrap().description(), "second");
    }
}
