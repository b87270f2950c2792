//! Integration tests for the purchase state machine and its idempotent,
//! counter-coupled completion.

mod common;

use common::{new_paid_prompt, seed_category, seed_published_prompt, seed_user};
use promptmart_db::repositories::{PromptRepo, PurchaseRepo};
use rust_decimal::Decimal;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn completion_increments_counter_once(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let buyer = seed_user(&pool, "buyer").await;
    let category = seed_category(&pool, "Business").await;
    let prompt = seed_published_prompt(
        &pool,
        author.id,
        &new_paid_prompt("Pitch Deck", category.id, Decimal::new(999, 2)),
    )
    .await;

    let purchase = PurchaseRepo::create(&pool, prompt.id, buyer.id, prompt.price, None)
        .await
        .unwrap();
    assert_eq!(purchase.payment_status, "pending");

    let (completed, transitioned) = PurchaseRepo::mark_completed(&pool, purchase.id)
        .await
        .unwrap()
        .unwrap();
    assert!(transitioned);
    assert_eq!(completed.payment_status, "completed");

    // A retried confirmation succeeds but changes nothing.
    let (again, transitioned) = PurchaseRepo::mark_completed(&pool, purchase.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!transitioned);
    assert_eq!(again.payment_status, "completed");

    let prompt_row = PromptRepo::find_by_id(&pool, prompt.id).await.unwrap().unwrap();
    assert_eq!(prompt_row.purchases, 1, "retries never double-count");
    assert_eq!(
        PurchaseRepo::completed_count(&pool, prompt.id).await.unwrap(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_purchase_can_still_complete(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let buyer = seed_user(&pool, "buyer").await;
    let category = seed_category(&pool, "Legal").await;
    let prompt = seed_published_prompt(
        &pool,
        author.id,
        &new_paid_prompt("Contract Review", category.id, Decimal::new(1500, 2)),
    )
    .await;

    let purchase = PurchaseRepo::create(&pool, prompt.id, buyer.id, prompt.price, None)
        .await
        .unwrap();

    let failed = PurchaseRepo::mark_failed(&pool, purchase.id).await.unwrap().unwrap();
    assert_eq!(failed.payment_status, "failed");

    // A late gateway confirmation after a transient failure still lands.
    let (completed, transitioned) = PurchaseRepo::mark_completed(&pool, purchase.id)
        .await
        .unwrap()
        .unwrap();
    assert!(transitioned);
    assert_eq!(completed.payment_status, "completed");

    let prompt_row = PromptRepo::find_by_id(&pool, prompt.id).await.unwrap().unwrap();
    assert_eq!(prompt_row.purchases, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn refund_is_terminal_and_keeps_counter(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let buyer = seed_user(&pool, "buyer").await;
    let category = seed_category(&pool, "Finance").await;
    let prompt = seed_published_prompt(
        &pool,
        author.id,
        &new_paid_prompt("Budget Planner", category.id, Decimal::new(499, 2)),
    )
    .await;

    let purchase = PurchaseRepo::create(&pool, prompt.id, buyer.id, prompt.price, None)
        .await
        .unwrap();
    PurchaseRepo::mark_completed(&pool, purchase.id).await.unwrap();

    let refunded = PurchaseRepo::mark_refunded(&pool, purchase.id).await.unwrap().unwrap();
    assert_eq!(refunded.payment_status, "refunded");

    // Refunds keep the historical count; a refunded purchase cannot be
    // re-completed.
    let prompt_row = PromptRepo::find_by_id(&pool, prompt.id).await.unwrap().unwrap();
    assert_eq!(prompt_row.purchases, 1);

    let (still_refunded, transitioned) = PurchaseRepo::mark_completed(&pool, purchase.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!transitioned);
    assert_eq!(still_refunded.payment_status, "refunded");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn has_completed_sees_only_completed(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let buyer = seed_user(&pool, "buyer").await;
    let category = seed_category(&pool, "Science").await;
    let prompt = seed_published_prompt(
        &pool,
        author.id,
        &new_paid_prompt("Lab Notes", category.id, Decimal::new(299, 2)),
    )
    .await;

    let purchase = PurchaseRepo::create(&pool, prompt.id, buyer.id, prompt.price, None)
        .await
        .unwrap();
    assert!(!PurchaseRepo::has_completed(&pool, prompt.id, buyer.id).await.unwrap());

    PurchaseRepo::mark_completed(&pool, purchase.id).await.unwrap();
    assert!(PurchaseRepo::has_completed(&pool, prompt.id, buyer.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn transaction_id_lookup(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let buyer = seed_user(&pool, "buyer").await;
    let category = seed_category(&pool, "Travel").await;
    let prompt = seed_published_prompt(
        &pool,
        author.id,
        &new_paid_prompt("Itinerary", category.id, Decimal::new(199, 2)),
    )
    .await;

    let purchase = PurchaseRepo::create(&pool, prompt.id, buyer.id, prompt.price, Some("pi_123"))
        .await
        .unwrap();

    let found = PurchaseRepo::find_by_transaction_id(&pool, purchase.transaction_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, purchase.id);
    assert_eq!(found.external_ref.as_deref(), Some("pi_123"));
}
