//! Rating aggregator: review upsert and the mean/count aggregates the
//! catalog displays and sorts by.

use promptmart_core::types::DbId;
use sqlx::PgPool;

use crate::models::review::{Review, ReviewWithVerification, UpsertReview};

/// Column list for `reviews` queries.
const COLUMNS: &str = "\
    id, prompt_id, user_id, rating, title, comment, is_verified_purchase, \
    helpful_votes, created_at, updated_at";

/// Read-time verified flag: the stored flag OR any completed purchase by
/// the reviewer. Computed, not stored, so later purchase completions are
/// reflected.
const VERIFIED_EXPR: &str = "\
    (r.is_verified_purchase OR EXISTS (SELECT 1 FROM purchases p \
     WHERE p.prompt_id = r.prompt_id AND p.user_id = r.user_id \
       AND p.payment_status = 'completed'))";

pub struct ReviewRepo;

impl ReviewRepo {
    /// Add a review, or update the caller's existing one in place.
    ///
    /// At most one review exists per (prompt, user): a second submission
    /// overwrites rating/title/comment rather than erroring. The stored
    /// verified-purchase flag is set from the purchase log at write time
    /// and only ever widens.
    pub async fn upsert(
        pool: &PgPool,
        prompt_id: DbId,
        user_id: DbId,
        input: &UpsertReview,
    ) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (prompt_id, user_id, rating, title, comment, is_verified_purchase) \
             VALUES ($1, $2, $3, $4, $5, \
                     EXISTS (SELECT 1 FROM purchases p \
                             WHERE p.prompt_id = $1 AND p.user_id = $2 \
                               AND p.payment_status = 'completed')) \
             ON CONFLICT (prompt_id, user_id) DO UPDATE SET \
                 rating = EXCLUDED.rating, \
                 title = EXCLUDED.title, \
                 comment = EXCLUDED.comment, \
                 is_verified_purchase = reviews.is_verified_purchase OR EXCLUDED.is_verified_purchase, \
                 updated_at = now() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(prompt_id)
            .bind(user_id)
            .bind(input.rating)
            .bind(input.title.as_deref().unwrap_or(""))
            .bind(input.comment.as_deref().unwrap_or(""))
            .fetch_one(pool)
            .await
    }

    /// List a prompt's reviews, newest first, with the computed verified flag.
    pub async fn list_for_prompt(
        pool: &PgPool,
        prompt_id: DbId,
        limit: i64,
    ) -> Result<Vec<ReviewWithVerification>, sqlx::Error> {
        let query = format!(
            "SELECT r.id, r.prompt_id, r.user_id, r.rating, r.title, r.comment, \
                    {VERIFIED_EXPR} AS verified, \
                    r.helpful_votes, r.created_at, r.updated_at \
             FROM reviews r \
             WHERE r.prompt_id = $1 \
             ORDER BY r.created_at DESC, r.id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, ReviewWithVerification>(&query)
            .bind(prompt_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_user(
        pool: &PgPool,
        prompt_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews WHERE prompt_id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(prompt_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Mean rating rounded to one decimal; 0 when no reviews exist.
    pub async fn average_rating(pool: &PgPool, prompt_id: DbId) -> Result<f64, sqlx::Error> {
        sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(ROUND(AVG(rating)::numeric, 1)::float8, 0) \
             FROM reviews WHERE prompt_id = $1",
        )
        .bind(prompt_id)
        .fetch_one(pool)
        .await
    }

    pub async fn rating_count(pool: &PgPool, prompt_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reviews WHERE prompt_id = $1")
            .bind(prompt_id)
            .fetch_one(pool)
            .await
    }

    /// Count a helpful vote. Returns `false` for a missing review.
    pub async fn add_helpful_vote(pool: &PgPool, review_id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE reviews SET helpful_votes = helpful_votes + 1 WHERE id = $1")
                .bind(review_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
