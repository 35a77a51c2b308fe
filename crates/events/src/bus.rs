//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`LaboratoryEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use marie_core::intent::{IntentSignal, LaboratoryIntent};
use marie_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// LaboratoryEvent
// ---------------------------------------------------------------------------

/// What happened to a laboratory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Created,
    Updated,
    Deleted,
    /// The user asked for something; nothing has changed yet.
    Intent(LaboratoryIntent),
}

/// A laboratory event with the time it was raised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaboratoryEvent {
    pub kind: EventKind,
    pub laboratory_id: DbId,
    pub timestamp: DateTime<Utc>,
}

impl LaboratoryEvent {
    pub fn new(kind: EventKind, laboratory_id: DbId) -> Self {
        Self {
            kind,
            laboratory_id,
            timestamp: Utc::now(),
        }
    }

    /// Dot-separated event name, e.g. `"laboratory.created"`.
    pub fn name(&self) -> &'static str {
        match self.kind {
            EventKind::Created => "laboratory.created",
            EventKind::Updated => "laboratory.updated",
            EventKind::Deleted => "laboratory.deleted",
            EventKind::Intent(intent) => intent.event_name(),
        }
    }
}

impl From<IntentSignal> for LaboratoryEvent {
    fn from(signal: IntentSignal) -> Self {
        Self::new(EventKind::Intent(signal.intent), signal.laboratory_id)
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`LaboratoryEvent`].
pub struct EventBus {
    sender: broadcast::Sender<LaboratoryEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: LaboratoryEvent) {
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<LaboratoryEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(LaboratoryEvent::new(EventKind::Updated, 42));

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.kind, EventKind::Updated);
        assert_eq!(received.laboratory_id, 42);
        assert_eq!(received.name(), "laboratory.updated");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(LaboratoryEvent::new(EventKind::Deleted, 3));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");
        assert_eq!(e1.laboratory_id, 3);
        assert_eq!(e2.laboratory_id, 3);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(LaboratoryEvent::new(EventKind::Created, 1));
    }

    #[test]
    fn intent_signal_becomes_intent_event() {
        let event = LaboratoryEvent::from(IntentSignal::new(7, LaboratoryIntent::Edit));
        assert_eq!(event.kind, EventKind::Intent(LaboratoryIntent::Edit));
        assert_eq!(event.laboratory_id, 7);
        assert_eq!(event.name(), "laboratory.edit_requested");
    }

    #[test]
    fn intent_kind_serializes_with_its_payload() {
        let json = serde_json::to_value(EventKind::Intent(LaboratoryIntent::Delete)).unwrap();
        assert_eq!(json, serde_json::json!({"intent": "delete"}));
        let json = serde_json::to_value(EventKind::Created).unwrap();
        assert_eq!(json, serde_json::json!("created"));
    }
}
