//! Integration tests for the daily analytics rollup and the creator
//! overview aggregates.

mod common;

use chrono::Utc;
use common::{new_paid_prompt, new_prompt, seed_category, seed_published_prompt, seed_user};
use promptmart_db::models::engagement::DownloadMeta;
use promptmart_db::repositories::{AnalyticsRepo, EngagementRepo, PurchaseRepo};
use rust_decimal::Decimal;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn rollup_is_idempotent(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let category = seed_category(&pool, "Design").await;
    let prompt = seed_published_prompt(
        &pool,
        author.id,
        &new_paid_prompt("Logo Kit", category.id, Decimal::new(799, 2)),
    )
    .await;

    let meta = DownloadMeta::default();
    EngagementRepo::record_download(&pool, prompt.id, alice.id, &meta).await.unwrap();
    EngagementRepo::record_download(&pool, prompt.id, bob.id, &meta).await.unwrap();

    let purchase = PurchaseRepo::create(&pool, prompt.id, alice.id, prompt.price, None)
        .await
        .unwrap();
    PurchaseRepo::mark_completed(&pool, purchase.id).await.unwrap();

    let today = Utc::now().date_naive();
    let first = AnalyticsRepo::rollup_day(&pool, prompt.id, today).await.unwrap();
    assert_eq!(first.downloads, 2);
    assert_eq!(first.purchases, 1);
    assert_eq!(first.revenue, Decimal::new(799, 2));

    // Re-running over the same events reproduces the same snapshot in the
    // same row.
    let second = AnalyticsRepo::rollup_day(&pool, prompt.id, today).await.unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.downloads, first.downloads);
    assert_eq!(second.purchases, first.purchases);
    assert_eq!(second.revenue, first.revenue);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rollup_buckets_by_utc_day(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let category = seed_category(&pool, "Photo").await;
    let prompt =
        seed_published_prompt(&pool, author.id, &new_prompt("Preset Pack", category.id)).await;

    let meta = DownloadMeta::default();
    EngagementRepo::record_download(&pool, prompt.id, alice.id, &meta).await.unwrap();
    EngagementRepo::record_download(&pool, prompt.id, bob.id, &meta).await.unwrap();

    // Move one download to yesterday.
    sqlx::query(
        "UPDATE downloads SET created_at = created_at - interval '1 day' \
         WHERE prompt_id = $1 AND user_id = $2",
    )
    .bind(prompt.id)
    .bind(bob.id)
    .execute(&pool)
    .await
    .unwrap();

    let today = Utc::now().date_naive();
    let yesterday = today.pred_opt().unwrap();

    let today_snap = AnalyticsRepo::rollup_day(&pool, prompt.id, today).await.unwrap();
    let yesterday_snap = AnalyticsRepo::rollup_day(&pool, prompt.id, yesterday).await.unwrap();

    assert_eq!(today_snap.downloads, 1);
    assert_eq!(yesterday_snap.downloads, 1);
    assert_eq!(today_snap.purchases + yesterday_snap.purchases, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn activity_scan_finds_only_active_prompts(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let alice = seed_user(&pool, "alice").await;
    let category = seed_category(&pool, "Audio").await;
    let busy = seed_published_prompt(&pool, author.id, &new_prompt("Mixing Tips", category.id)).await;
    let idle = seed_published_prompt(&pool, author.id, &new_prompt("Idle Prompt", category.id)).await;

    EngagementRepo::record_download(&pool, busy.id, alice.id, &DownloadMeta::default())
        .await
        .unwrap();

    let today = Utc::now().date_naive();
    let ids = AnalyticsRepo::prompt_ids_with_activity(&pool, today).await.unwrap();

    assert!(ids.contains(&busy.id));
    assert!(!ids.contains(&idle.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn creator_overview_sums_actual_amounts(pool: PgPool) {
    let creator = seed_user(&pool, "creator").await;
    let other = seed_user(&pool, "other").await;
    let buyer = seed_user(&pool, "buyer").await;
    let category = seed_category(&pool, "Writing").await;

    let paid = seed_published_prompt(
        &pool,
        creator.id,
        &new_paid_prompt("Novel Outline", category.id, Decimal::new(1200, 2)),
    )
    .await;
    common::seed_draft_prompt(&pool, creator.id, &new_prompt("Draft Idea", category.id)).await;
    seed_published_prompt(&pool, other.id, &new_prompt("Unrelated", category.id)).await;

    let purchase = PurchaseRepo::create(&pool, paid.id, buyer.id, paid.price, None)
        .await
        .unwrap();
    PurchaseRepo::mark_completed(&pool, purchase.id).await.unwrap();

    // A pending purchase earns nothing.
    PurchaseRepo::create(&pool, paid.id, other.id, paid.price, None).await.unwrap();

    let overview = AnalyticsRepo::creator_overview(&pool, creator.id).await.unwrap();
    assert_eq!(overview.total_prompts, 2);
    assert_eq!(overview.published_prompts, 1);
    assert_eq!(overview.total_purchases, 1);
    assert_eq!(overview.total_earnings, Decimal::new(1200, 2));
}
