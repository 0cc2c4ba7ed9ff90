//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` across the services; every
//! creation and transition on products, mint requests, and purchases
//! publishes a [`ChangeEvent`] here.

use chrono::{DateTime, Utc};
use metamind_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::subscription::EntitySubscription;

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// The row-level change sources consumers can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Products,
    MintRequests,
    Purchases,
}

impl EntityKind {
    /// The backing table name, as exposed on the notification channel.
    pub fn table_name(self) -> &'static str {
        match self {
            Self::Products => "ai_products",
            Self::MintRequests => "nft_mint_requests",
            Self::Purchases => "purchases",
        }
    }
}

// ---------------------------------------------------------------------------
// ChangeEvent
// ---------------------------------------------------------------------------

/// A row-level change notification.
///
/// Constructed via [`ChangeEvent::new`] and enriched with the builder
/// methods [`with_entity`](ChangeEvent::with_entity),
/// [`with_actor`](ChangeEvent::with_actor), and
/// [`with_payload`](ChangeEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Dot-separated event name, e.g. `"product.created"`.
    pub event_type: String,

    /// The entity kind whose backing row changed.
    pub entity_kind: Option<EntityKind>,

    /// Database id of the changed row.
    pub entity_id: Option<DbId>,

    /// Id of the user whose action triggered the change.
    pub actor_user_id: Option<DbId>,

    /// Free-form JSON payload. Consumers must not rely on its contents;
    /// a signal only means "re-read".
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            entity_kind: None,
            entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the changed entity to the event.
    pub fn with_entity(mut self, kind: EntityKind, id: DbId) -> Self {
        self.entity_kind = Some(kind);
        self.entity_id = Some(id);
        self
    }

    /// Attach the acting user to the event.
    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
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
/// independently receive every published [`ChangeEvent`].
pub struct EventBus {
    sender: broadcast::Sender<ChangeEvent>,
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
    /// The persistence task (when subscribed) ensures database capture.
    pub fn publish(&self, event: ChangeEvent) {
        // Ignore the SendError -- it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Subscribe to changes for a single entity kind.
    pub fn subscribe_entity(&self, kind: EntityKind) -> EntitySubscription {
        EntitySubscription::new(kind, self.sender.subscribe())
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

        let event = ChangeEvent::new("product.created")
            .with_entity(EntityKind::Products, 42)
            .with_actor(7)
            .with_payload(serde_json::json!({"title": "Sleep Hacks"}));

        bus.publish(event);

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, "product.created");
        assert_eq!(received.entity_kind, Some(EntityKind::Products));
        assert_eq!(received.entity_id, Some(42));
        assert_eq!(received.actor_user_id, Some(7));
        assert_eq!(received.payload["title"], "Sleep Hacks");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(ChangeEvent::new("purchase.created"));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.event_type, "purchase.created");
        assert_eq!(e2.event_type, "purchase.created");
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        // No subscribers -- this must not panic.
        bus.publish(ChangeEvent::new("mint_request.created"));
    }

    #[test]
    fn entity_kind_table_names() {
        assert_eq!(EntityKind::Products.table_name(), "ai_products");
        assert_eq!(EntityKind::MintRequests.table_name(), "nft_mint_requests");
        assert_eq!(EntityKind::Purchases.table_name(), "purchases");
    }
}
