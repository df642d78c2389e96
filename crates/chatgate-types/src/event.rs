//! Inbound backend event types.
//!
//! An `InboundEvent` is one notification delivered by the messaging backend.
//! Only events of kind [`EventKind::Message`] are routed to commands; every
//! other kind is dropped by the dispatcher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Backend event type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A chat message with a text body.
    Message,
    /// Someone started or stopped typing.
    Typing,
    /// A read receipt for an earlier message.
    ReadReceipt,
    /// Presence/online status change.
    Presence,
    /// Any event type this gateway does not understand.
    #[serde(other)]
    Other,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            EventKind::Message => "message",
            EventKind::Typing => "typing",
            EventKind::ReadReceipt => "read_receipt",
            EventKind::Presence => "presence",
            EventKind::Other => "other",
        };
        f.write_str(tag)
    }
}

/// One inbound notification from the messaging backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    /// UUIDv7 assigned on receipt.
    pub id: Uuid,
    /// Event type tag.
    pub kind: EventKind,
    /// Identifier of the account that sent the message.
    pub sender_id: String,
    /// Destination thread/conversation. Replies go here.
    pub thread_id: String,
    /// Raw message text (empty for non-message events).
    #[serde(default)]
    pub body: String,
    /// When the gateway received the event.
    pub received_at: DateTime<Utc>,
}

impl InboundEvent {
    /// Build a `message` event received now.
    pub fn message(
        sender_id: impl Into<String>,
        thread_id: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind: EventKind::Message,
            sender_id: sender_id.into(),
            thread_id: thread_id.into(),
            body: body.into(),
            received_at: Utc::now(),
        }
    }

    /// Build a non-message event of the given kind.
    pub fn other(
        kind: EventKind,
        sender_id: impl Into<String>,
        thread_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind,
            sender_id: sender_id.into(),
            thread_id: thread_id.into(),
            body: String::new(),
            received_at: Utc::now(),
        }
    }

    pub fn is_message(&self) -> bool {
        self.kind == EventKind::Message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_constructor_sets_kind() {
        let event = InboundEvent::message("u1", "t1", "/ping");
        assert!(event.is_message());
        assert_eq!(event.sender_id, "u1");
        assert_eq!(event.thread_id, "t1");
        assert_eq!(event.body, "/ping");
    }

    #[test]
    fn other_constructor_has_empty_body() {
        let event = InboundEvent::other(EventKind::Typing, "u1", "t1");
        assert!(!event.is_message());
        assert!(event.body.is_empty());
    }

    #[test]
    fn unknown_kind_deserializes_as_other() {
        let kind: EventKind = serde_json::from_str("\"message_reaction\"").unwrap();
        assert_eq!(kind, EventKind::Other);
        let kind: EventKind = serde_json::from_str("\"read_receipt\"").unwrap();
        assert_eq!(kind, EventKind::ReadReceipt);
    }

    #[test]
    fn event_json_omitted_body_defaults_empty() {
        let json = r#"{
            "id": "01900000-0000-7000-8000-000000000000",
            "kind": "presence",
            "sender_id": "u1",
            "thread_id": "t1",
            "received_at": "2026-01-01T00:00:00Z"
        }"#;
        let event: InboundEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind, EventKind::Presence);
        assert_eq!(event.body, "");
    }

    #[test]
    fn kind_display_matches_serde_tag() {
        assert_eq!(EventKind::Message.to_string(), "message");
        assert_eq!(
            serde_json::to_string(&EventKind::ReadReceipt).unwrap(),
            format!("\"{}\"", EventKind::ReadReceipt)
        );
    }
}
