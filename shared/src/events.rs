//! Store events pushed to connected browser tabs over SSE

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Named event kinds emitted by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Connected,
    UiSectionUpdate,
    LanguagePackUpdate,
    OrderUpdate,
    InventoryUpdate,
    Heartbeat,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::UiSectionUpdate => "ui-section-update",
            Self::LanguagePackUpdate => "language-pack-update",
            Self::OrderUpdate => "order-update",
            Self::InventoryUpdate => "inventory-update",
            Self::Heartbeat => "heartbeat",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire shape of a pushed event: `{type, data, timestamp}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub data: Value,
    /// Unix millis
    pub timestamp: i64,
}

impl StoreEvent {
    pub fn new(kind: EventKind, data: Value) -> Self {
        Self {
            kind,
            data,
            timestamp: crate::util::now_millis(),
        }
    }

    /// The synthetic event every new SSE connection receives first
    pub fn connected() -> Self {
        Self::new(
            EventKind::Connected,
            serde_json::json!({ "message": "connected" }),
        )
    }

    pub fn heartbeat() -> Self {
        Self::new(EventKind::Heartbeat, Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_names() {
        assert_eq!(EventKind::UiSectionUpdate.as_str(), "ui-section-update");
        assert_eq!(
            EventKind::LanguagePackUpdate.as_str(),
            "language-pack-update"
        );
        assert_eq!(EventKind::OrderUpdate.as_str(), "order-update");
        assert_eq!(EventKind::InventoryUpdate.as_str(), "inventory-update");
        assert_eq!(EventKind::Heartbeat.as_str(), "heartbeat");
    }

    #[test]
    fn test_event_serializes_with_type_field() {
        let event = StoreEvent::new(
            EventKind::OrderUpdate,
            serde_json::json!({ "order_id": 42 }),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "order-update");
        assert_eq!(json["data"]["order_id"], 42);
        assert!(json["timestamp"].is_i64());
    }

    #[test]
    fn test_connected_event() {
        let event = StoreEvent::connected();
        assert_eq!(event.kind, EventKind::Connected);
    }
}
