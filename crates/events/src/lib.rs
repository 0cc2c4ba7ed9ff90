//! Change-notification infrastructure.
//!
//! Whenever a product, mint request, or purchase row changes, a
//! [`ChangeEvent`] is published on the in-process [`EventBus`]. Consumers
//! subscribe per entity kind and treat every signal as "re-read" -- no
//! payload semantics are guaranteed beyond that.
//!
//! - [`EventBus`] -- publish/subscribe hub backed by `tokio::sync::broadcast`.
//! - [`EntityKind`] / [`EntitySubscription`] -- per-table change signals.
//! - [`EventPersistence`] -- background task mirroring every event into the
//!   `events` table.

pub mod bus;
pub mod persistence;
pub mod subscription;

pub use bus::{ChangeEvent, EntityKind, EventBus};
pub use persistence::EventPersistence;
pub use subscription::EntitySubscription;
