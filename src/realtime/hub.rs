use crate::domain::services::lifecycle::LifecycleStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};

/// Fire-and-forget notification fanned out to an event's subscribers.
/// Clients that were disconnected at publish time get nothing; a
/// reconnecting client re-fetches authoritative state instead of relying
/// on replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    SlotsUpdated {
        event_id: String,
        available_slots: i32,
    },
    CountdownTick {
        event_id: String,
        status: LifecycleStatus,
        time_remaining_ms: i64,
        event_time: DateTime<Utc>,
        duration_min: i32,
    },
    EventCreated { event_id: String },
    EventUpdated { event_id: String },
    EventDeleted { event_id: String },
}

/// Per-event broadcast topics. Subscribing creates the topic lazily;
/// unsubscribing is dropping the receiver (plus an idempotent prune of the
/// empty topic). A publish to a topic without subscribers is a no-op.
pub struct EventHub {
    topics: RwLock<HashMap<String, broadcast::Sender<Notification>>>,
    channel_capacity: usize,
}

impl EventHub {
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            channel_capacity,
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(128)
    }

    pub async fn subscribe(&self, event_id: &str) -> broadcast::Receiver<Notification> {
        let mut topics = self.topics.write().await;
        let sender = topics.entry(event_id.to_string()).or_insert_with(|| {
            let (tx, _) = broadcast::channel(self.channel_capacity);
            tx
        });
        sender.subscribe()
    }

    pub async fn publish(&self, event_id: &str, notification: Notification) {
        let topics = self.topics.read().await;
        if let Some(sender) = topics.get(event_id) {
            // No receivers is fine.
            let _ = sender.send(notification);
        }
    }

    /// Drops the topic once nobody listens. Safe to call any number of
    /// times, including for ids that never had a topic.
    pub async fn prune(&self, event_id: &str) {
        let mut topics = self.topics.write().await;
        let empty = topics.get(event_id).is_some_and(|s| s.receiver_count() == 0);
        if empty {
            topics.remove(event_id);
        }
    }

    pub async fn subscriber_count(&self, event_id: &str) -> usize {
        let topics = self.topics.read().await;
        topics.get(event_id).map(|s| s.receiver_count()).unwrap_or(0)
    }

    pub async fn topic_count(&self) -> usize {
        self.topics.read().await.len()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
