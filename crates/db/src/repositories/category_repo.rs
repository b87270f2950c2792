//! Repository for the `categories` table.

use promptmart_core::slug::slugify;
use promptmart_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::{Category, CategoryWithCount, CreateCategory, UpdateCategory};

/// Column list for `categories` queries.
const COLUMNS: &str = "id, name, slug, description, is_active, created_at, updated_at";

pub struct CategoryRepo;

impl CategoryRepo {
    /// Create a category. The slug is derived from the name.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, slug, description) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(slugify(&input.name))
            .bind(input.description.as_deref().unwrap_or(""))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE slug = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List active categories with their published, active prompt counts,
    /// most populated first.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<CategoryWithCount>, sqlx::Error> {
        sqlx::query_as::<_, CategoryWithCount>(
            "SELECT c.id, c.name, c.slug, c.description, c.is_active, \
                    (SELECT COUNT(*) FROM prompts p \
                     WHERE p.category_id = c.id \
                       AND p.status = 'published' AND p.is_active = true) AS prompt_count \
             FROM categories c \
             WHERE c.is_active = true \
             ORDER BY prompt_count DESC, c.name",
        )
        .fetch_all(pool)
        .await
    }

    /// Update a category's name, description, or active flag. Slug is
    /// immutable. Returns `None` if no category with the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 is_active = COALESCE($4, is_active), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.description.as_deref())
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category. Cascade-deletes every prompt in it, along with
    /// their reviews, events, and snapshots. A caller-visible destructive
    /// operation.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
