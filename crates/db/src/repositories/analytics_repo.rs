//! Analytics rollup: idempotent daily snapshots recomputed strictly from
//! the event streams, plus the creator dashboard aggregates.

use chrono::NaiveDate;
use promptmart_core::types::DbId;
use sqlx::PgPool;

use crate::models::analytics::{CreatorOverview, DailyAnalytics};

/// Column list for `prompt_analytics` queries.
const COLUMNS: &str = "\
    id, prompt_id, date, views, downloads, purchases, revenue, \
    created_at, updated_at";

pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Recompute one prompt's snapshot for a UTC calendar day and upsert
    /// it, overwriting any existing row for (prompt, date).
    ///
    /// Figures come only from events dated that day: downloads from the
    /// download stream, purchases and revenue from completed purchase
    /// events. There is no per-view event stream, so the daily view figure
    /// follows the download stream; keeping the snapshot purely
    /// event-derived is what makes re-running safe. Identical event data
    /// always produces an identical snapshot, so retried or corrective
    /// runs never double-count.
    pub async fn rollup_day(
        pool: &PgPool,
        prompt_id: DbId,
        date: NaiveDate,
    ) -> Result<DailyAnalytics, sqlx::Error> {
        let query = format!(
            "INSERT INTO prompt_analytics (prompt_id, date, views, downloads, purchases, revenue) \
             SELECT $1, $2, \
                 (SELECT COUNT(*) FROM downloads d \
                  WHERE d.prompt_id = $1 AND (d.created_at AT TIME ZONE 'UTC')::date = $2), \
                 (SELECT COUNT(*) FROM downloads d \
                  WHERE d.prompt_id = $1 AND (d.created_at AT TIME ZONE 'UTC')::date = $2), \
                 (SELECT COUNT(*) FROM purchases pu \
                  WHERE pu.prompt_id = $1 AND pu.payment_status = 'completed' \
                    AND (pu.created_at AT TIME ZONE 'UTC')::date = $2), \
                 (SELECT COALESCE(SUM(pu.amount), 0) FROM purchases pu \
                  WHERE pu.prompt_id = $1 AND pu.payment_status = 'completed' \
                    AND (pu.created_at AT TIME ZONE 'UTC')::date = $2) \
             ON CONFLICT (prompt_id, date) DO UPDATE SET \
                 views = EXCLUDED.views, \
                 downloads = EXCLUDED.downloads, \
                 purchases = EXCLUDED.purchases, \
                 revenue = EXCLUDED.revenue, \
                 updated_at = now() \
             RETURNING {COLUMNS}"
        );
        let snapshot = sqlx::query_as::<_, DailyAnalytics>(&query)
            .bind(prompt_id)
            .bind(date)
            .fetch_one(pool)
            .await?;

        tracing::debug!(
            prompt_id,
            date = %date,
            downloads = snapshot.downloads,
            purchases = snapshot.purchases,
            "Daily analytics rolled up"
        );
        Ok(snapshot)
    }

    /// Prompts with any download or purchase event on the given UTC day.
    /// Drives the background rollup so idle prompts are skipped.
    pub async fn prompt_ids_with_activity(
        pool: &PgPool,
        date: NaiveDate,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT DISTINCT prompt_id FROM ( \
                 SELECT prompt_id FROM downloads \
                 WHERE (created_at AT TIME ZONE 'UTC')::date = $1 \
                 UNION \
                 SELECT prompt_id FROM purchases \
                 WHERE (created_at AT TIME ZONE 'UTC')::date = $1 \
             ) ev",
        )
        .bind(date)
        .fetch_all(pool)
        .await
    }

    /// Recent snapshots for a prompt, newest first.
    pub async fn list_for_prompt(
        pool: &PgPool,
        prompt_id: DbId,
        limit: i64,
    ) -> Result<Vec<DailyAnalytics>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM prompt_analytics \
             WHERE prompt_id = $1 \
             ORDER BY date DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, DailyAnalytics>(&query)
            .bind(prompt_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Lifetime aggregates for a creator's dashboard. Earnings sum actual
    /// completed purchase amounts rather than multiplying current prices.
    pub async fn creator_overview(
        pool: &PgPool,
        author_id: DbId,
    ) -> Result<CreatorOverview, sqlx::Error> {
        sqlx::query_as::<_, CreatorOverview>(
            "SELECT \
                 COUNT(*) AS total_prompts, \
                 COUNT(*) FILTER (WHERE status = 'published') AS published_prompts, \
                 COALESCE(SUM(downloads), 0)::bigint AS total_downloads, \
                 COALESCE(SUM(purchases), 0)::bigint AS total_purchases, \
                 COALESCE((SELECT SUM(pu.amount) FROM purchases pu \
                           JOIN prompts pr ON pr.id = pu.prompt_id \
                           WHERE pr.author_id = $1 \
                             AND pu.payment_status = 'completed'), 0) AS total_earnings \
             FROM prompts \
             WHERE author_id = $1",
        )
        .bind(author_id)
        .fetch_one(pool)
        .await
    }
}
