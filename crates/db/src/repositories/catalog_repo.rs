//! Catalog query engine: filtered, sorted, paginated listings over
//! published entries, plus the featured/trending/related shelves.
//!
//! Optional filters use null-guarded binds (`$n IS NULL OR ...`) so one
//! statement serves every filter combination; ORDER BY clauses come from a
//! fixed table keyed by the sort strategy.

use chrono::Duration;
use promptmart_core::catalog::{CatalogSort, PAGE_SIZE};
use promptmart_core::engagement::{
    FEATURED_MIN_ENGAGEMENT, FEATURED_MIN_RATING, TRENDING_MIN_ACTIVITY, TRENDING_WINDOW_DAYS,
};
use promptmart_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::catalog::{CatalogEntry, CatalogFilter, PagedResult};

/// Select list shared by every listing query: entry columns plus the
/// computed rating aggregate and engagement score.
const ENTRY_SELECT: &str = "\
    p.id, p.title, p.slug, p.description, p.preview_content, \
    p.author_id, p.category_id, p.price_type, p.price, p.difficulty_level, \
    p.views, p.downloads, p.purchases, p.favorites, \
    COALESCE((SELECT ROUND(AVG(r.rating)::numeric, 1)::float8 \
              FROM reviews r WHERE r.prompt_id = p.id), 0) AS average_rating, \
    (SELECT COUNT(*) FROM reviews r WHERE r.prompt_id = p.id) AS rating_count, \
    (p.views + p.downloads + p.purchases + p.favorites) AS engagement, \
    p.created_at, p.published_at";

/// Filter clause shared by the count and page queries. Only published,
/// active entries are ever eligible, regardless of the filter.
///
/// Binds: $1 ILIKE pattern, $2 category, $3 price type, $4 max price,
/// $5 difficulty, $6 tag ids, $7 min rating.
const FILTER_WHERE: &str = "\
    p.status = 'published' AND p.is_active = true \
    AND ($1::text IS NULL \
         OR p.title ILIKE $1 OR p.description ILIKE $1 OR p.content ILIKE $1 \
         OR EXISTS (SELECT 1 FROM prompt_tags pt JOIN tags t ON t.id = pt.tag_id \
                    WHERE pt.prompt_id = p.id AND t.name ILIKE $1)) \
    AND ($2::bigint IS NULL OR p.category_id = $2) \
    AND ($3::text IS NULL OR p.price_type = $3) \
    AND ($4::numeric IS NULL OR p.price <= $4) \
    AND ($5::text IS NULL OR p.difficulty_level = $5) \
    AND ($6::bigint[] IS NULL \
         OR EXISTS (SELECT 1 FROM prompt_tags pt2 \
                    WHERE pt2.prompt_id = p.id AND pt2.tag_id = ANY ($6))) \
    AND ($7::float8 IS NULL \
         OR COALESCE((SELECT AVG(r.rating)::float8 \
                      FROM reviews r WHERE r.prompt_id = p.id), 0) >= $7)";

pub struct CatalogRepo;

impl CatalogRepo {
    /// Answer a catalog search: one page of entries plus the total match
    /// count. Page numbers are 1-based and clamp up to 1; a page past the
    /// end is an empty page with the true total, not an error.
    pub async fn search(
        pool: &PgPool,
        filter: &CatalogFilter,
        sort: CatalogSort,
        page: i64,
    ) -> Result<PagedResult<CatalogEntry>, sqlx::Error> {
        let page = page.max(1);
        let pattern = filter.query.as_deref().map(like_pattern);

        let count_query = format!("SELECT COUNT(*) FROM prompts p WHERE {FILTER_WHERE}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(pattern.as_deref())
            .bind(filter.category_id)
            .bind(filter.price_type.as_deref())
            .bind(filter.max_price)
            .bind(filter.difficulty_level.as_deref())
            .bind(filter.tag_ids.as_deref())
            .bind(filter.min_rating)
            .fetch_one(pool)
            .await?;

        let page_query = format!(
            "SELECT {ENTRY_SELECT} FROM prompts p \
             WHERE {FILTER_WHERE} \
             ORDER BY {order} \
             LIMIT $8 OFFSET $9",
            order = order_clause(sort)
        );
        let items = sqlx::query_as::<_, CatalogEntry>(&page_query)
            .bind(pattern.as_deref())
            .bind(filter.category_id)
            .bind(filter.price_type.as_deref())
            .bind(filter.max_price)
            .bind(filter.difficulty_level.as_deref())
            .bind(filter.tag_ids.as_deref())
            .bind(filter.min_rating)
            .bind(PAGE_SIZE)
            .bind((page - 1) * PAGE_SIZE)
            .fetch_all(pool)
            .await?;

        Ok(PagedResult::new(items, total, page, PAGE_SIZE))
    }

    /// The featured shelf: published, active entries over both featured
    /// thresholds, highest engagement first.
    pub async fn featured(pool: &PgPool, limit: i64) -> Result<Vec<CatalogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTRY_SELECT} FROM prompts p \
             WHERE p.status = 'published' AND p.is_active = true \
               AND (p.views + p.downloads + p.purchases + p.favorites) > $1 \
               AND COALESCE((SELECT AVG(r.rating)::float8 \
                             FROM reviews r WHERE r.prompt_id = p.id), 0) >= $2 \
             ORDER BY engagement DESC, p.id DESC \
             LIMIT $3"
        );
        sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(FEATURED_MIN_ENGAGEMENT)
            .bind(FEATURED_MIN_RATING)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// The trending shelf: entries whose download + completed-purchase
    /// count within the trailing window of `now` meets the trending
    /// threshold, most active first.
    pub async fn trending(
        pool: &PgPool,
        now: Timestamp,
        limit: i64,
    ) -> Result<Vec<CatalogEntry>, sqlx::Error> {
        let cutoff = now - Duration::days(TRENDING_WINDOW_DAYS);
        let query = format!(
            "SELECT {ENTRY_SELECT}, activity.recent \
             FROM prompts p \
             JOIN (SELECT prompt_id, COUNT(*) AS recent FROM ( \
                       SELECT prompt_id FROM downloads \
                       WHERE created_at >= $1 AND created_at <= $2 \
                       UNION ALL \
                       SELECT prompt_id FROM purchases \
                       WHERE payment_status = 'completed' \
                         AND created_at >= $1 AND created_at <= $2 \
                   ) ev GROUP BY prompt_id) activity \
               ON activity.prompt_id = p.id \
             WHERE p.status = 'published' AND p.is_active = true \
               AND activity.recent >= $3 \
             ORDER BY activity.recent DESC, p.id DESC \
             LIMIT $4"
        );
        sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(cutoff)
            .bind(now)
            .bind(TRENDING_MIN_ACTIVITY)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Published, active entries in the same category sharing at least one
    /// tag with the given entry, newest first.
    pub async fn related(
        pool: &PgPool,
        prompt_id: DbId,
        limit: i64,
    ) -> Result<Vec<CatalogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTRY_SELECT} FROM prompts p \
             WHERE p.status = 'published' AND p.is_active = true \
               AND p.id <> $1 \
               AND p.category_id = (SELECT category_id FROM prompts WHERE id = $1) \
               AND EXISTS (SELECT 1 FROM prompt_tags a \
                           JOIN prompt_tags b ON b.tag_id = a.tag_id \
                           WHERE a.prompt_id = p.id AND b.prompt_id = $1) \
             ORDER BY p.created_at DESC, p.id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(prompt_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}

/// ORDER BY clause for a sort strategy. Every strategy tie-breaks on
/// entry id descending for a stable, deterministic ordering.
fn order_clause(sort: CatalogSort) -> &'static str {
    match sort {
        CatalogSort::Newest => "p.created_at DESC, p.id DESC",
        CatalogSort::Oldest => "p.created_at ASC, p.id DESC",
        CatalogSort::Popular => "engagement DESC, p.id DESC",
        CatalogSort::Rating => "average_rating DESC, p.id DESC",
        CatalogSort::PriceLow => "p.price ASC, p.id DESC",
        CatalogSort::PriceHigh => "p.price DESC, p.id DESC",
    }
}

/// Wrap a validated query in ILIKE wildcards, escaping the ones the user
/// typed so they match literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
