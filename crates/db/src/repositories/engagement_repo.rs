//! Counter store: view/download/favorite mutations and windowed activity
//! counts.
//!
//! Every counter moves through an atomic read-modify-write UPDATE so
//! concurrent requests never lose increments. Where a dedup check and a
//! counter increment belong together (downloads, favorites) they commit in
//! one transaction: both happen or neither does.

use chrono::Duration;
use promptmart_core::engagement::TRENDING_WINDOW_DAYS;
use promptmart_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::engagement::{DownloadEvent, DownloadMeta, Favorite, UsageStats};

/// Column list for `downloads` queries.
const DOWNLOAD_COLUMNS: &str = "id, prompt_id, user_id, ip_address, user_agent, created_at";

/// Column list for `favorites` queries.
const FAVORITE_COLUMNS: &str = "id, user_id, prompt_id, created_at";

pub struct EngagementRepo;

impl EngagementRepo {
    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// Count a page view. Every view counts; there is no per-user dedup.
    ///
    /// Returns `false` if the prompt does not exist.
    pub async fn record_view(pool: &PgPool, prompt_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE prompts SET views = views + 1 WHERE id = $1")
            .bind(prompt_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Downloads
    // -----------------------------------------------------------------------

    /// Record a download for (prompt, user), incrementing the prompt's
    /// download counter in the same transaction as the event insert.
    ///
    /// Returns `None` when the pair has already downloaded; nothing is
    /// counted in that case.
    pub async fn record_download(
        pool: &PgPool,
        prompt_id: DbId,
        user_id: DbId,
        meta: &DownloadMeta,
    ) -> Result<Option<DownloadEvent>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO downloads (prompt_id, user_id, ip_address, user_agent) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (prompt_id, user_id) DO NOTHING \
             RETURNING {DOWNLOAD_COLUMNS}"
        );
        let event = sqlx::query_as::<_, DownloadEvent>(&query)
            .bind(prompt_id)
            .bind(user_id)
            .bind(meta.ip_address.as_deref())
            .bind(meta.user_agent.as_deref())
            .fetch_optional(&mut *tx)
            .await?;

        if event.is_none() {
            return Ok(None);
        }

        sqlx::query("UPDATE prompts SET downloads = downloads + 1 WHERE id = $1")
            .bind(prompt_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(prompt_id, user_id, "Download recorded");
        Ok(event)
    }

    pub async fn has_downloaded(
        pool: &PgPool,
        prompt_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM downloads WHERE prompt_id = $1 AND user_id = $2)",
        )
        .bind(prompt_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Favorites
    // -----------------------------------------------------------------------

    /// Favorite a prompt for a user, incrementing the favorite counter in
    /// the same transaction. Returns `None` if already favorited.
    pub async fn add_favorite(
        pool: &PgPool,
        user_id: DbId,
        prompt_id: DbId,
    ) -> Result<Option<Favorite>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO favorites (user_id, prompt_id) \
             VALUES ($1, $2) \
             ON CONFLICT (user_id, prompt_id) DO NOTHING \
             RETURNING {FAVORITE_COLUMNS}"
        );
        let favorite = sqlx::query_as::<_, Favorite>(&query)
            .bind(user_id)
            .bind(prompt_id)
            .fetch_optional(&mut *tx)
            .await?;

        if favorite.is_none() {
            return Ok(None);
        }

        sqlx::query("UPDATE prompts SET favorites = favorites + 1 WHERE id = $1")
            .bind(prompt_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(favorite)
    }

    /// Remove a favorite, decrementing the counter (floored at zero) in
    /// the same transaction. Returns `false` when no favorite existed;
    /// the counter is untouched in that case.
    pub async fn remove_favorite(
        pool: &PgPool,
        user_id: DbId,
        prompt_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND prompt_id = $2")
            .bind(user_id)
            .bind(prompt_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE prompts SET favorites = GREATEST(favorites - 1, 0) WHERE id = $1")
            .bind(prompt_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Windowed activity
    // -----------------------------------------------------------------------

    /// Download events plus completed purchase events within the trailing
    /// trending window of `now`. Recomputed on every call; a cheap repeated
    /// scan that is fine at catalog scale.
    pub async fn recent_activity(
        pool: &PgPool,
        prompt_id: DbId,
        now: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let cutoff = now - Duration::days(TRENDING_WINDOW_DAYS);
        sqlx::query_scalar::<_, i64>(
            "SELECT (SELECT COUNT(*) FROM downloads \
                     WHERE prompt_id = $1 AND created_at >= $2 AND created_at <= $3) \
                  + (SELECT COUNT(*) FROM purchases \
                     WHERE prompt_id = $1 AND payment_status = 'completed' \
                       AND created_at >= $2 AND created_at <= $3)",
        )
        .bind(prompt_id)
        .bind(cutoff)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    /// Downloads and completed purchases over the trailing `days` of `now`.
    pub async fn usage_window(
        pool: &PgPool,
        prompt_id: DbId,
        days: i64,
        now: Timestamp,
    ) -> Result<UsageStats, sqlx::Error> {
        let cutoff = now - Duration::days(days);
        let (downloads, purchases): (i64, i64) = sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM downloads \
                     WHERE prompt_id = $1 AND created_at >= $2 AND created_at <= $3), \
                    (SELECT COUNT(*) FROM purchases \
                     WHERE prompt_id = $1 AND payment_status = 'completed' \
                       AND created_at >= $2 AND created_at <= $3)",
        )
        .bind(prompt_id)
        .bind(cutoff)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(UsageStats {
            downloads,
            purchases,
            total: downloads + purchases,
        })
    }

    // -----------------------------------------------------------------------
    // Consistency checks
    // -----------------------------------------------------------------------

    /// Event-table count the `downloads` counter must equal.
    pub async fn download_event_count(pool: &PgPool, prompt_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM downloads WHERE prompt_id = $1")
            .bind(prompt_id)
            .fetch_one(pool)
            .await
    }

    /// Row count the `favorites` counter must equal.
    pub async fn favorite_count(pool: &PgPool, prompt_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM favorites WHERE prompt_id = $1")
            .bind(prompt_id)
            .fetch_one(pool)
            .await
    }
}
