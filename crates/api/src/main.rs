use std::net::SocketAddr;
use std::sync::Arc;

use metamind_ai::{AiClient, AiConfig};
use metamind_chain::{ChainConfig, ContractReader, HttpMintSubmitter, MetadataFetcher};
use metamind_events::{EventBus, EventPersistence};
use metamind_payments::{HttpPaymentGateway, PaymentConfig};
use metamind_pipeline::{
    DraftService, MintService, PublishService, PurchaseService, TitleResolver,
};
use metamind_storage::{S3Config, S3Storage};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod config;
mod error;
mod router;
mod routes;
mod state;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "metamind_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server_config = config::ServerConfig::from_env();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = metamind_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    metamind_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    metamind_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // Change-notification bus plus the durable event log behind it.
    let bus = Arc::new(EventBus::default());
    tokio::spawn(EventPersistence::run(pool.clone(), bus.subscribe()));

    // External collaborators.
    let store = Arc::new(S3Storage::connect(S3Config::from_env()).await);
    let ai = Arc::new(AiClient::new(AiConfig::from_env()));
    let gateway = Arc::new(HttpPaymentGateway::new(PaymentConfig::from_env()));
    let submitter = Arc::new(HttpMintSubmitter::new(
        server_config.mint_worker_url.clone(),
        30,
    ));
    let chain = Arc::new(ContractReader::new(ChainConfig::from_env()));
    let metadata = Arc::new(MetadataFetcher::new(30));

    let state = state::AppState {
        pool: pool.clone(),
        bus: bus.clone(),
        jwt: auth::JwtConfig::from_env(),
        confirmation_secret: server_config.confirmation_secret.clone(),
        drafts: Arc::new(DraftService::new(pool.clone())),
        titles: Arc::new(TitleResolver::new(pool.clone(), ai.clone())),
        publish: Arc::new(PublishService::new(pool.clone(), store, bus.clone())),
        mint: Arc::new(MintService::new(
            pool.clone(),
            bus.clone(),
            submitter,
            server_config.public_base_url.clone(),
        )),
        purchases: Arc::new(PurchaseService::new(pool, gateway, bus)),
        ai,
        chain,
        metadata,
    };

    let app = router::build(state, &server_config);

    let addr = SocketAddr::new(
        server_config.host.parse().expect("Invalid HOST"),
        server_config.port,
    );
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
