//! Database-backed properties of the pipeline.
//!
//! These tests exercise the version-assignment serialization point, the
//! mint state machine, the purchase price snapshot, and title resolution
//! against a live PostgreSQL instance:
//!
//! ```sh
//! DATABASE_URL=postgres://... cargo test -p metamind-pipeline -- --ignored
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use metamind_ai::{AiClient, AiConfig};
use metamind_chain::{ChainError, MintConfirmation, MintSubmitter, NftMetadata};
use metamind_core::error::CoreError;
use metamind_core::types::{Actor, DbId};
use metamind_db::models::draft::CreateDraft;
use metamind_db::models::product::CreateProduct;
use metamind_db::repositories::ProductRepo;
use metamind_events::EventBus;
use metamind_payments::StubGateway;
use metamind_pipeline::{
    DraftService, MintService, PurchaseOutcome, PurchaseService, TitleResolver,
};

/// Submitter that accepts every submission without side effects.
struct NoopSubmitter;

#[async_trait]
impl MintSubmitter for NoopSubmitter {
    async fn submit(&self, _request_id: DbId, _metadata: &NftMetadata) -> Result<(), ChainError> {
        Ok(())
    }
}

fn draft(content: &str) -> CreateDraft {
    CreateDraft {
        content: content.into(),
        title: None,
        chapters: None,
        word_count: None,
    }
}

async fn seed_product(pool: &sqlx::PgPool, owner: Actor, title: &str, price_cents: i64) -> DbId {
    let product = ProductRepo::create(
        pool,
        owner.id,
        &CreateProduct {
            title: title.into(),
            description: "test product".into(),
            content_key: format!("{}/content.pdf", owner.id),
            content_url: "https://storage.test/ai-assets/content.pdf".into(),
            preview_key: None,
            preview_url: None,
            price_cents,
        },
    )
    .await
    .unwrap();
    product.id
}

fn mint_service(pool: sqlx::PgPool) -> MintService {
    MintService::new(
        pool,
        Arc::new(EventBus::default()),
        Arc::new(NoopSubmitter),
        "https://metamind.test",
    )
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL instance"]
async fn sequential_saves_yield_contiguous_descending_versions(pool: sqlx::PgPool) {
    let svc = DraftService::new(pool);
    let actor = Actor::new(11);

    for i in 1..=5 {
        let saved = svc.save(actor, draft(&format!("draft number {i}"))).await.unwrap();
        assert_eq!(saved.version, i);
    }

    let drafts = svc.list(actor).await.unwrap();
    let versions: Vec<i32> = drafts.iter().map(|d| d.version).collect();
    assert_eq!(versions, vec![5, 4, 3, 2, 1]);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL instance"]
async fn concurrent_saves_never_share_a_version(pool: sqlx::PgPool) {
    let svc = Arc::new(DraftService::new(pool));
    let actor = Actor::new(12);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let svc = svc.clone();
            tokio::spawn(async move { svc.save(actor, draft(&format!("writer {i}"))).await })
        })
        .collect();

    let mut versions = Vec::new();
    for handle in handles {
        versions.push(handle.await.unwrap().unwrap().version);
    }

    versions.sort_unstable();
    assert_eq!(versions, (1..=8).collect::<Vec<i32>>());
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL instance"]
async fn omitted_word_count_uses_whitespace_token_rule(pool: sqlx::PgPool) {
    let svc = DraftService::new(pool);
    let saved = svc.save(Actor::new(13), draft("a  b\tc\n")).await.unwrap();
    assert_eq!(saved.word_count, 3);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL instance"]
async fn deleting_a_draft_does_not_reassign_its_version(pool: sqlx::PgPool) {
    let svc = DraftService::new(pool);
    let actor = Actor::new(14);

    let first = svc.save(actor, draft("one")).await.unwrap();
    let second = svc.save(actor, draft("two")).await.unwrap();
    assert_eq!((first.version, second.version), (1, 2));

    svc.delete(actor, second.id).await.unwrap();

    // Versions are never decremented or reused after a delete.
    let third = svc.save(actor, draft("three")).await.unwrap();
    assert_eq!(third.version, 2);

    let missing = svc.delete(actor, second.id).await;
    assert!(matches!(missing, Err(CoreError::NotFound { .. })));
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL instance"]
async fn mint_confirmations_are_applied_exactly_once(pool: sqlx::PgPool) {
    let owner = Actor::new(15);
    let product_id = seed_product(&pool, owner, "Mintable", 1000).await;
    let svc = mint_service(pool);

    let request = svc.create_request(owner, product_id).await.unwrap();
    assert_eq!(request.status, "pending");
    assert!(request.txn_hash.is_none());

    let minted = svc
        .apply_confirmation(
            request.id,
            MintConfirmation::Minted {
                txn_hash: "0xabc".into(),
                metadata_url: "ipfs://cid".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(minted.status, "minted");
    assert_eq!(minted.txn_hash.as_deref(), Some("0xabc"));

    // Duplicate delivery of the same confirmation is rejected.
    let duplicate = svc
        .apply_confirmation(
            request.id,
            MintConfirmation::Minted {
                txn_hash: "0xabc".into(),
                metadata_url: "ipfs://cid".into(),
            },
        )
        .await;
    assert!(matches!(duplicate, Err(CoreError::Conflict(_))));

    // A failure report after the terminal state is rejected too.
    let late_failure = svc
        .apply_confirmation(request.id, MintConfirmation::Failed)
        .await;
    assert!(matches!(late_failure, Err(CoreError::Conflict(_))));
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL instance"]
async fn successful_confirmation_snapshots_the_price(pool: sqlx::PgPool) {
    let owner = Actor::new(16);
    let buyer = Actor::new(17);
    let product_id = seed_product(&pool, owner, "Priced", 500).await;

    let svc = PurchaseService::new(
        pool.clone(),
        Arc::new(StubGateway::succeeding("pi_snapshot")),
        Arc::new(EventBus::default()),
    );

    let secret = svc.create_intent(buyer, product_id, 500).await.unwrap();
    let outcome = svc.confirm(buyer, product_id, &secret, "card").await.unwrap();

    let purchase = match outcome {
        PurchaseOutcome::Succeeded { purchase } => purchase,
        PurchaseOutcome::Failed { reason } => panic!("payment declined: {reason}"),
    };
    assert_eq!(purchase.price_cents, 500);
    assert_eq!(purchase.payment_id, "pi_snapshot");

    // A later price change must not affect the recorded purchase.
    sqlx::query("UPDATE ai_products SET price_cents = 900 WHERE id = $1")
        .bind(product_id)
        .execute(&pool)
        .await
        .unwrap();

    let purchases = svc.list(buyer).await.unwrap();
    assert_eq!(purchases.len(), 1);
    assert_eq!(purchases[0].price_cents, 500);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL instance"]
async fn declined_confirmation_creates_no_purchase_row(pool: sqlx::PgPool) {
    let owner = Actor::new(18);
    let buyer = Actor::new(19);
    let product_id = seed_product(&pool, owner, "Declined", 500).await;

    let svc = PurchaseService::new(
        pool,
        Arc::new(StubGateway::declining("insufficient_funds")),
        Arc::new(EventBus::default()),
    );

    let secret = svc.create_intent(buyer, product_id, 500).await.unwrap();
    let outcome = svc.confirm(buyer, product_id, &secret, "card").await.unwrap();

    assert!(
        matches!(outcome, PurchaseOutcome::Failed { reason } if reason == "insufficient_funds")
    );
    assert!(svc.list(buyer).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires a PostgreSQL instance"]
async fn colliding_title_gets_revised_edition_suggestion(pool: sqlx::PgPool) {
    let owner = Actor::new(20);
    seed_product(&pool, owner, "Sleep Hacks", 500).await;

    let ai = Arc::new(AiClient::new(AiConfig {
        base_url: "http://127.0.0.1:9".into(),
        timeout_secs: 1,
    }));
    let resolver = TitleResolver::new(pool, ai);

    let check = resolver.check_title("sleep hacks").await;
    assert!(!check.is_unique);
    assert_eq!(
        check.suggested.as_deref(),
        Some("sleep hacks - Revised Edition")
    );

    let fresh = resolver.check_title("Completely Different").await;
    assert!(fresh.is_unique);
}
