//! Gateway configuration loader.
//!
//! Reads `config.json` (`~/.chatgate/config.json` in production) and
//! deserializes it into [`BotConfig`]. Falls back to defaults when the
//! file is missing or malformed; a bad config never stops startup.

use std::path::Path;

use chatgate_types::config::BotConfig;

/// File name of the gateway config inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Load gateway configuration from `config_path`.
///
/// - If the file does not exist, returns [`BotConfig::default()`] (no admins,
///   30 second command timeout).
/// - If the file exists but fails to read or parse, logs a warning and
///   returns the default.
pub async fn load_bot_config(config_path: &Path) -> BotConfig {
    let content = match tokio::fs::read_to_string(config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("No {CONFIG_FILE} found at {}, using defaults", config_path.display());
            return BotConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return BotConfig::default();
        }
    };

    match serde_json::from_str::<BotConfig>(&content) {
        Ok(config) => {
            tracing::debug!(
                admins = config.admins.len(),
                command_timeout_secs = config.command_timeout_secs,
                "loaded {}",
                config_path.display()
            );
            config
        }
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            BotConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_bot_config(&tmp.path().join(CONFIG_FILE)).await;
        assert!(config.admins.is_empty());
        assert_eq!(config.command_timeout(), Some(Duration::from_secs(30)));
    }

    #[tokio::test]
    async fn valid_json_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"{ "admins": ["100001", "100002"], "command_timeout_secs": 0 }"#,
        )
        .await
        .unwrap();

        let config = load_bot_config(&tmp.path().join(CONFIG_FILE)).await;
        assert_eq!(config.admins, vec!["100001", "100002"]);
        assert_eq!(config.command_timeout(), None);
        assert!(config.admin_list().contains("100002"));
    }

    #[tokio::test]
    async fn partial_json_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join(CONFIG_FILE), r#"{ "admins": ["a"] }"#)
            .await
            .unwrap();

        let config = load_bot_config(&tmp.path().join(CONFIG_FILE)).await;
        assert_eq!(config.admins, vec!["a"]);
        assert_eq!(config.command_timeout_secs, 30);
    }

    #[tokio::test]
    async fn invalid_json_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join(CONFIG_FILE), "{ admins: nope")
            .await
            .unwrap();

        let config = load_bot_config(&tmp.path().join(CONFIG_FILE)).await;
        assert!(config.admins.is_empty());
        assert_eq!(config.command_timeout_secs, 30);
    }

    #[tokio::test]
    async fn wrong_shape_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join(CONFIG_FILE), r#"["not", "an", "object"]"#)
            .await
            .unwrap();

        let config = load_bot_config(&tmp.path().join(CONFIG_FILE)).await;
        assert!(config.admins.is_empty());
    }
}
