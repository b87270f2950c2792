//! Integration tests for the rating aggregator: upsert semantics, the
//! rounded mean, and the computed verified flag.

mod common;

use common::{new_paid_prompt, new_prompt, seed_category, seed_published_prompt, seed_user};
use promptmart_db::models::review::UpsertReview;
use promptmart_db::repositories::{PurchaseRepo, ReviewRepo};
use rust_decimal::Decimal;
use sqlx::PgPool;

fn review(rating: i16) -> UpsertReview {
    UpsertReview {
        rating,
        title: None,
        comment: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_submission_overwrites_in_place(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let reviewer = seed_user(&pool, "reviewer").await;
    let category = seed_category(&pool, "Email").await;
    let prompt =
        seed_published_prompt(&pool, author.id, &new_prompt("Cold Outreach", category.id)).await;

    let first = ReviewRepo::upsert(&pool, prompt.id, reviewer.id, &review(2)).await.unwrap();
    let second = ReviewRepo::upsert(
        &pool,
        prompt.id,
        reviewer.id,
        &UpsertReview {
            rating: 5,
            title: Some("Changed my mind".to_string()),
            comment: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(second.id, first.id, "same row, not a second review");
    assert_eq!(second.rating, 5);
    assert_eq!(second.title, "Changed my mind");
    assert_eq!(ReviewRepo::rating_count(&pool, prompt.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn average_is_rounded_to_one_decimal(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let r1 = seed_user(&pool, "r1").await;
    let r2 = seed_user(&pool, "r2").await;
    let r3 = seed_user(&pool, "r3").await;
    let category = seed_category(&pool, "Resume").await;
    let prompt = seed_published_prompt(&pool, author.id, &new_prompt("CV Builder", category.id)).await;

    assert_eq!(ReviewRepo::average_rating(&pool, prompt.id).await.unwrap(), 0.0);

    ReviewRepo::upsert(&pool, prompt.id, r1.id, &review(5)).await.unwrap();
    ReviewRepo::upsert(&pool, prompt.id, r2.id, &review(4)).await.unwrap();
    ReviewRepo::upsert(&pool, prompt.id, r3.id, &review(4)).await.unwrap();

    // 13/3 = 4.333... rounds to 4.3
    assert_eq!(ReviewRepo::average_rating(&pool, prompt.id).await.unwrap(), 4.3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn verified_flag_reflects_later_purchase(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let buyer = seed_user(&pool, "buyer").await;
    let category = seed_category(&pool, "SEO").await;
    let prompt = seed_published_prompt(
        &pool,
        author.id,
        &new_paid_prompt("Keyword Magic", category.id, Decimal::new(999, 2)),
    )
    .await;

    // Review lands before the purchase completes.
    let stored = ReviewRepo::upsert(&pool, prompt.id, buyer.id, &review(4)).await.unwrap();
    assert!(!stored.is_verified_purchase);

    let purchase = PurchaseRepo::create(&pool, prompt.id, buyer.id, prompt.price, None)
        .await
        .unwrap();
    PurchaseRepo::mark_completed(&pool, purchase.id).await.unwrap();

    // The read path computes verification from the purchase log, so the
    // old review now reads as verified.
    let listed = ReviewRepo::list_for_prompt(&pool, prompt.id, 10).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].verified);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn helpful_votes_accumulate(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let reviewer = seed_user(&pool, "reviewer").await;
    let category = seed_category(&pool, "Law").await;
    let prompt = seed_published_prompt(&pool, author.id, &new_prompt("Clause Check", category.id)).await;

    let stored = ReviewRepo::upsert(&pool, prompt.id, reviewer.id, &review(5)).await.unwrap();

    assert!(ReviewRepo::add_helpful_vote(&pool, stored.id).await.unwrap());
    assert!(ReviewRepo::add_helpful_vote(&pool, stored.id).await.unwrap());
    assert!(!ReviewRepo::add_helpful_vote(&pool, stored.id + 999).await.unwrap());

    let listed = ReviewRepo::list_for_prompt(&pool, prompt.id, 10).await.unwrap();
    assert_eq!(listed[0].helpful_votes, 2);
}
