//! EventHub — real-time store event fan-out
//!
//! Admin edits and order/payment changes are pushed to every connected
//! storefront and admin console over SSE:
//!
//! ```text
//! handler / background task
//!       │ publish(StoreEvent)
//!       ▼
//!    EventHub
//!      ├── tx: broadcast::Sender<StoreEvent>  (fan-out to SSE streams)
//!      └── recent: ring buffer of the last 100 events (debugging only,
//!          never replayed to clients)
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::broadcast;

use hanmall_shared::events::{EventKind, StoreEvent};

/// Broadcast channel capacity, enough to absorb a burst while a slow
/// subscriber catches up
const BROADCAST_CAPACITY: usize = 256;

/// How many past events the hub keeps for inspection
const RECENT_CAPACITY: usize = 100;

#[derive(Clone)]
pub struct EventHub {
    tx: broadcast::Sender<StoreEvent>,
    recent: Arc<Mutex<VecDeque<StoreEvent>>>,
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            recent: Arc::new(Mutex::new(VecDeque::with_capacity(RECENT_CAPACITY))),
        }
    }

    /// New subscribers only see events published after this call; the recent
    /// buffer is intentionally not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, kind: EventKind, data: Value) {
        self.publish_event(StoreEvent::new(kind, data));
    }

    pub fn publish_event(&self, event: StoreEvent) {
        if let Ok(mut recent) = self.recent.lock() {
            if recent.len() == RECENT_CAPACITY {
                recent.pop_front();
            }
            recent.push_back(event.clone());
        }
        // No subscribers is fine; the event still lands in `recent`.
        let _ = self.tx.send(event);
    }

    /// Snapshot of the retained event history, oldest first.
    pub fn recent(&self) -> Vec<StoreEvent> {
        self.recent
            .lock()
            .map(|recent| recent.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn publish_reaches_subscriber() {
        let hub = EventHub::new();
        let mut rx = hub.subscribe();
        hub.publish(EventKind::OrderUpdate, json!({"order_id": 7}));
        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind, EventKind::OrderUpdate);
        assert_eq!(event.data["order_id"], 7);
    }

    #[test]
    fn publish_without_subscribers_is_ok() {
        let hub = EventHub::new();
        hub.publish(EventKind::Heartbeat, json!({}));
        assert_eq!(hub.recent().len(), 1);
    }

    #[test]
    fn recent_buffer_is_bounded() {
        let hub = EventHub::new();
        for i in 0..150 {
            hub.publish(EventKind::InventoryUpdate, json!({"seq": i}));
        }
        let recent = hub.recent();
        assert_eq!(recent.len(), RECENT_CAPACITY);
        assert_eq!(recent[0].data["seq"], 50);
        assert_eq!(recent[RECENT_CAPACITY - 1].data["seq"], 149);
    }

    #[tokio::test]
    async fn subscriber_does_not_see_history() {
        let hub = EventHub::new();
        hub.publish(EventKind::UiSectionUpdate, json!({"before": true}));
        let mut rx = hub.subscribe();
        hub.publish(EventKind::UiSectionUpdate, json!({"after": true}));
        let event = rx.recv().await.unwrap();
        assert_eq!(event.data["after"], true);
        assert!(rx.try_recv().is_err());
    }
}
