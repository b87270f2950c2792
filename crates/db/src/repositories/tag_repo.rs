//! Repository for the `tags` and `prompt_tags` tables.
//!
//! `usage_count` on a tag is a denormalized count of prompts carrying it,
//! adjusted only when an association is actually created or removed.

use promptmart_core::slug::slugify;
use promptmart_core::types::DbId;
use sqlx::PgPool;

use crate::models::tag::Tag;

/// Column list for `tags` queries.
const COLUMNS: &str = "id, name, slug, usage_count, created_at";

pub struct TagRepo;

impl TagRepo {
    /// Create a tag or return the existing one if the normalized name
    /// already exists. Uses `ON CONFLICT` for idempotent creation.
    pub async fn create_or_get(pool: &PgPool, name: &str) -> Result<Tag, sqlx::Error> {
        let normalized = name.trim().to_lowercase();
        let query = format!(
            "INSERT INTO tags (name, slug) \
             VALUES ($1, $2) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(&normalized)
            .bind(slugify(&normalized))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE slug = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List tags by usage, most used first. Unused tags are omitted.
    pub async fn list_popular(pool: &PgPool, limit: i64) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tags \
             WHERE usage_count > 0 \
             ORDER BY usage_count DESC, name \
             LIMIT $1"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// List the tags attached to a prompt, alphabetically.
    pub async fn list_for_prompt(pool: &PgPool, prompt_id: DbId) -> Result<Vec<Tag>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            "SELECT t.id, t.name, t.slug, t.usage_count, t.created_at \
             FROM prompt_tags pt \
             JOIN tags t ON t.id = pt.tag_id \
             WHERE pt.prompt_id = $1 \
             ORDER BY t.name",
        )
        .bind(prompt_id)
        .fetch_all(pool)
        .await
    }

    /// Replace a prompt's tag associations with the given set, adjusting
    /// each affected tag's `usage_count` in the same transaction.
    pub async fn set_for_prompt(
        pool: &PgPool,
        prompt_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Release current associations and their usage counts.
        sqlx::query(
            "UPDATE tags SET usage_count = GREATEST(usage_count - 1, 0) \
             WHERE id IN (SELECT tag_id FROM prompt_tags WHERE prompt_id = $1)",
        )
        .bind(prompt_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM prompt_tags WHERE prompt_id = $1")
            .bind(prompt_id)
            .execute(&mut *tx)
            .await?;

        for &tag_id in tag_ids {
            let result = sqlx::query(
                "INSERT INTO prompt_tags (prompt_id, tag_id) \
                 VALUES ($1, $2) \
                 ON CONFLICT (prompt_id, tag_id) DO NOTHING",
            )
            .bind(prompt_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() > 0 {
                sqlx::query("UPDATE tags SET usage_count = usage_count + 1 WHERE id = $1")
                    .bind(tag_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }
}
