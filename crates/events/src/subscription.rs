//! Per-entity-kind change subscriptions.

use tokio::sync::broadcast;

use crate::bus::{ChangeEvent, EntityKind};

/// A filtered view of the event bus for one [`EntityKind`].
///
/// Consumers hold one of these per cached list (products, mint requests,
/// purchases) and re-fetch whenever [`changed`](Self::changed) yields.
pub struct EntitySubscription {
    kind: EntityKind,
    receiver: broadcast::Receiver<ChangeEvent>,
}

impl EntitySubscription {
    pub(crate) fn new(kind: EntityKind, receiver: broadcast::Receiver<ChangeEvent>) -> Self {
        Self { kind, receiver }
    }

    /// The entity kind this subscription filters on.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Wait for the next change touching the subscribed entity kind.
    ///
    /// Returns `Some(())` when a matching change occurred and `None` once
    /// the bus is closed. Delivery is at-least-once with no payload
    /// guarantees: a lagged receiver yields a signal immediately, since
    /// missed events still mean the cached view is stale.
    pub async fn changed(&mut self) -> Option<()> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.entity_kind == Some(self.kind) => return Some(()),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(
                        skipped,
                        kind = self.kind.table_name(),
                        "Subscription lagged; signalling re-read"
                    );
                    return Some(());
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
