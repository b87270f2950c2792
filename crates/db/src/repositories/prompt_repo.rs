//! Repository for the `prompts` table: lifecycle CRUD.
//!
//! Counter mutations live in `EngagementRepo`; nothing here touches the
//! denormalized counters.

use promptmart_core::catalog::{price_type, status};
use promptmart_core::slug::{slugify, with_suffix};
use promptmart_core::types::DbId;
use sqlx::PgPool;

use crate::models::prompt::{CreatePrompt, Prompt, UpdatePrompt};
use crate::repositories::TagRepo;

/// Column list for `prompts` queries.
const COLUMNS: &str = "\
    id, title, slug, description, content, preview_content, \
    author_id, category_id, price_type, price, status, is_active, \
    difficulty_level, views, downloads, purchases, favorites, \
    created_at, updated_at, published_at";

pub struct PromptRepo;

impl PromptRepo {
    /// Create a prompt in `draft` status for the given author.
    ///
    /// The slug is derived from the title and de-duplicated with a numeric
    /// suffix; it never changes afterwards, even if the title does.
    pub async fn create(
        pool: &PgPool,
        author_id: DbId,
        input: &CreatePrompt,
    ) -> Result<Prompt, sqlx::Error> {
        let slug = Self::unique_slug(pool, &input.title).await?;

        let query = format!(
            "INSERT INTO prompts \
                 (title, slug, description, content, preview_content, \
                  author_id, category_id, price_type, price, difficulty_level) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        let prompt = sqlx::query_as::<_, Prompt>(&query)
            .bind(&input.title)
            .bind(&slug)
            .bind(&input.description)
            .bind(&input.content)
            .bind(input.preview_content.as_deref().unwrap_or(""))
            .bind(author_id)
            .bind(input.category_id)
            .bind(input.price_type.as_deref().unwrap_or(price_type::FREE))
            .bind(input.price.unwrap_or_default())
            .bind(
                input
                    .difficulty_level
                    .as_deref()
                    .unwrap_or("intermediate"),
            )
            .fetch_one(pool)
            .await?;

        if !input.tag_ids.is_empty() {
            TagRepo::set_for_prompt(pool, prompt.id, &input.tag_ids).await?;
        }

        Ok(prompt)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Prompt>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prompts WHERE id = $1");
        sqlx::query_as::<_, Prompt>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Prompt>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prompts WHERE slug = $1");
        sqlx::query_as::<_, Prompt>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Find a prompt by slug, restricted to published, active entries —
    /// the only ones the public catalog may see.
    pub async fn find_published_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Prompt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM prompts \
             WHERE slug = $1 AND status = 'published' AND is_active = true"
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_author(pool: &PgPool, author_id: DbId) -> Result<Vec<Prompt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM prompts \
             WHERE author_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(author_id)
            .fetch_all(pool)
            .await
    }

    /// Update a prompt's editable fields. Slug, author, status, and the
    /// counters are untouched here. Returns `None` for a missing prompt.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePrompt,
    ) -> Result<Option<Prompt>, sqlx::Error> {
        let query = format!(
            "UPDATE prompts SET \
                 title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 content = COALESCE($4, content), \
                 preview_content = COALESCE($5, preview_content), \
                 category_id = COALESCE($6, category_id), \
                 price_type = COALESCE($7, price_type), \
                 price = COALESCE($8, price), \
                 difficulty_level = COALESCE($9, difficulty_level), \
                 is_active = COALESCE($10, is_active), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Prompt>(&query)
            .bind(id)
            .bind(input.title.as_deref())
            .bind(input.description.as_deref())
            .bind(input.content.as_deref())
            .bind(input.preview_content.as_deref())
            .bind(input.category_id)
            .bind(input.price_type.as_deref())
            .bind(input.price)
            .bind(input.difficulty_level.as_deref())
            .bind(input.is_active)
            .fetch_optional(pool)
            .await?;

        if updated.is_some() {
            if let Some(tag_ids) = &input.tag_ids {
                TagRepo::set_for_prompt(pool, id, tag_ids).await?;
            }
        }

        Ok(updated)
    }

    /// Publish a prompt. `published_at` is set on the first transition only
    /// and survives later archive/publish cycles.
    pub async fn publish(pool: &PgPool, id: DbId) -> Result<Option<Prompt>, sqlx::Error> {
        let query = format!(
            "UPDATE prompts SET \
                 status = 'published', \
                 published_at = COALESCE(published_at, now()), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Move a prompt to `archived` or `moderated`. Publishing goes through
    /// [`Self::publish`] so the published timestamp is handled there.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        new_status: &str,
    ) -> Result<Option<Prompt>, sqlx::Error> {
        debug_assert!(status::is_valid(new_status) && new_status != status::PUBLISHED);
        let query = format!(
            "UPDATE prompts SET status = $2, updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(id)
            .bind(new_status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a prompt. Cascade-deletes its reviews, events, favorites,
    /// and analytics snapshots.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM prompts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Derive a slug from the title, appending `-2`, `-3`, ... while the
    /// candidate is taken. Slug uniqueness is also enforced by the schema.
    async fn unique_slug(pool: &PgPool, title: &str) -> Result<String, sqlx::Error> {
        let base = slugify(title);
        let mut candidate = base.clone();
        let mut n = 2;

        loop {
            let taken: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM prompts WHERE slug = $1)")
                    .bind(&candidate)
                    .fetch_one(pool)
                    .await?;
            if !taken {
                return Ok(candidate);
            }
            candidate = with_suffix(&base, n);
            n += 1;
        }
    }
}
