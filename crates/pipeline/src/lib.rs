//! Orchestration services for the content pipeline.
//!
//! Each service owns one slice of the flow from raw idea to sold product:
//!
//! - [`DraftService`] -- analyze text, persist immutable draft versions.
//! - [`TitleResolver`] -- advisory title uniqueness and suggestions.
//! - [`PublishService`] -- validated asset uploads and product creation.
//! - [`MintService`] -- the mint request state machine.
//! - [`PurchaseService`] -- the two-phase payment and purchase flow.
//!
//! Services hold a [`DbPool`](metamind_db::DbPool) plus the gateway traits
//! they drive, take an explicit [`Actor`](metamind_core::types::Actor) on
//! every operation, and publish [`ChangeEvent`](metamind_events::ChangeEvent)s
//! for every row-level mutation.

pub mod drafts;
pub mod minting;
pub mod publishing;
pub mod purchases;
pub mod titles;

use metamind_core::error::CoreError;

pub use drafts::DraftService;
pub use minting::MintService;
pub use publishing::PublishService;
pub use purchases::{PurchaseOutcome, PurchaseService};
pub use titles::{TitleCheck, TitleResolver};

/// Map a database failure on a write/read path to the domain taxonomy.
pub(crate) fn infra(err: sqlx::Error) -> CoreError {
    CoreError::Infrastructure(format!("Database error: {err}"))
}
