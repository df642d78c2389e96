//! Gateway configuration types.
//!
//! `BotConfig` mirrors `config.json` in the data directory. Every field has a
//! default so a missing or partial file still yields a usable config.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level gateway configuration, loaded from `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Sender ids granted admin handling.
    #[serde(default)]
    pub admins: Vec<String>,

    /// Upper bound for one command invocation, in seconds. `0` disables it.
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
}

fn default_command_timeout_secs() -> u64 {
    30
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            admins: Vec::new(),
            command_timeout_secs: default_command_timeout_secs(),
        }
    }
}

impl BotConfig {
    /// The per-invocation timeout, or `None` when disabled.
    pub fn command_timeout(&self) -> Option<Duration> {
        match self.command_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn admin_list(&self) -> AdminList {
        AdminList::new(self.admins.iter().cloned())
    }
}

/// Static allow-list of privileged sender ids.
///
/// Membership is exact (ids are opaque backend identifiers, not names).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminList {
    ids: HashSet<String>,
}

impl AdminList {
    pub fn new(ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn contains(&self, sender_id: &str) -> bool {
        self.ids.contains(sender_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Admin ids in sorted order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.ids.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
