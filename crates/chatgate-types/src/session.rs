//! Shared session state.
//!
//! `SessionState` is an open-ended JSON object keyed by whatever the commands
//! choose (usually a sender or thread id). It serialises transparently as a
//! plain JSON object so the on-disk file stays human-editable.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Process-wide key/value state shared by every command invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionState(Map<String, Value>);

impl SessionState {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    /// Insert or replace a value. Returns the previous value, if any.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Get the value under `key`, inserting `default` first when absent.
    pub fn entry_or_insert(&mut self, key: &str, default: Value) -> &mut Value {
        self.0.entry(key.to_string()).or_insert(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

impl From<Map<String, Value>> for SessionState {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_as_plain_object() {
        let mut state = SessionState::new();
        state.set("100012345", "x");
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"100012345":"x"}"#);
    }

    #[test]
    fn non_object_json_is_rejected() {
        assert!(serde_json::from_str::<SessionState>("[1, 2, 3]").is_err());
        assert!(serde_json::from_str::<SessionState>("\"text\"").is_err());
    }

    #[test]
    fn set_returns_previous_value() {
        let mut state = SessionState::new();
        assert!(state.set("k", 1).is_none());
        assert_eq!(state.set("k", 2), Some(json!(1)));
        assert_eq!(state.get("k"), Some(&json!(2)));
    }

    #[test]
    fn entry_or_insert_keeps_existing() {
        let mut state = SessionState::new();
        state.set("counter", 5);
        let value = state.entry_or_insert("counter", json!(0));
        assert_eq!(*value, json!(5));

        let fresh = state.entry_or_insert("other", json!({"hits": 0}));
        fresh["hits"] = json!(1);
        assert_eq!(state.get("other"), Some(&json!({"hits": 1})));
    }

    #[test]
    fn remove_and_len() {
        let mut state = SessionState::new();
        state.set("a", true);
        state.set("b", false);
        assert_eq!(state.len(), 2);
        assert_eq!(state.remove("a"), Some(json!(true)));
        assert!(!state.contains_key("a"));
        assert_eq!(state.len(), 1);
    }
}
