//! Shared application state.

use std::sync::Arc;

use metamind_ai::AiClient;
use metamind_chain::{ContractReader, MetadataFetcher};
use metamind_db::DbPool;
use metamind_events::EventBus;
use metamind_pipeline::{
    DraftService, MintService, PublishService, PurchaseService, TitleResolver,
};

use crate::auth::JwtConfig;

/// Everything the handlers need, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub bus: Arc<EventBus>,
    pub jwt: JwtConfig,
    /// Shared secret expected on mint confirmation callbacks.
    pub confirmation_secret: String,

    pub drafts: Arc<DraftService>,
    pub titles: Arc<TitleResolver>,
    pub publish: Arc<PublishService>,
    pub mint: Arc<MintService>,
    pub purchases: Arc<PurchaseService>,

    pub ai: Arc<AiClient>,
    pub chain: Arc<ContractReader>,
    pub metadata: Arc<MetadataFetcher>,
}
