use std::time::Duration;

use thiserror::Error;

/// Errors raised by a command invocation.
///
/// `Display` is the log form and may carry internal detail. What the chat
/// user sees comes from [`CommandError::user_message`].
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("permission denied")]
    PermissionDenied,

    #[error("{0}")]
    Failed(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("cancelled")]
    Cancelled,

    #[error("panicked: {0}")]
    Panicked(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CommandError {
    /// Shorthand for [`CommandError::Failed`].
    pub fn failed(message: impl Into<String>) -> Self {
        CommandError::Failed(message.into())
    }

    /// Render the error as the text sent back to the chat thread.
    pub fn user_message(&self) -> String {
        match self {
            CommandError::InvalidArguments(usage) => usage.clone(),
            CommandError::PermissionDenied => {
                "You do not have permission to use this command.".to_string()
            }
            CommandError::Failed(message) => message.clone(),
            CommandError::Timeout(after) => {
                format!("command timed out after {}s", after.as_secs())
            }
            CommandError::Cancelled => "command was cancelled".to_string(),
            CommandError::Panicked(_) | CommandError::Internal(_) => {
                "internal error".to_string()
            }
        }
    }

    /// Stable machine-readable kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            CommandError::InvalidArguments(_) => "invalid_arguments",
            CommandError::PermissionDenied => "permission_denied",
            CommandError::Failed(_) => "failed",
            CommandError::Timeout(_) => "timeout",
            CommandError::Cancelled => "cancelled",
            CommandError::Panicked(_) => "panicked",
            CommandError::Internal(_) => "internal",
        }
    }
}

/// Errors from the backend transport when delivering a message.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("transport error: {0}")]
    Transport(String),
}

/// Errors from session state persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Reasons a single command unit was skipped during registry load.
#[derive(Debug, Error)]
pub enum PluginLoadError {
    #[error("{unit}: missing 'name' property")]
    MissingName { unit: String },

    #[error("{unit}: {reason}")]
    Invalid { unit: String, reason: String },
}

/// Errors from the messaging backend connection.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("listen error: {0}")]
    Listen(String),

    #[error("disconnected")]
    Disconnected,
}
