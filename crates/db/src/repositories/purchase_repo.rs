//! Repository for the `purchases` table.
//!
//! Purchase completion is the one path that may be invoked more than once
//! for the same event (retried gateway webhooks, concurrent deliveries).
//! The status-guarded UPDATE takes the row lock, so concurrent completions
//! serialize; only the invocation that actually transitions the status
//! increments the prompt's purchase counter.

use promptmart_core::types::DbId;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::purchase::Purchase;

/// Column list for `purchases` queries.
const COLUMNS: &str = "\
    id, prompt_id, user_id, amount, payment_status, transaction_id, \
    external_ref, created_at, updated_at";

pub struct PurchaseRepo;

impl PurchaseRepo {
    /// Open a purchase in `pending` status with a fresh transaction id.
    pub async fn create(
        pool: &PgPool,
        prompt_id: DbId,
        user_id: DbId,
        amount: Decimal,
        external_ref: Option<&str>,
    ) -> Result<Purchase, sqlx::Error> {
        let query = format!(
            "INSERT INTO purchases (prompt_id, user_id, amount, transaction_id, external_ref) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Purchase>(&query)
            .bind(prompt_id)
            .bind(user_id)
            .bind(amount)
            .bind(Uuid::new_v4())
            .bind(external_ref)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Purchase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM purchases WHERE id = $1");
        sqlx::query_as::<_, Purchase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_transaction_id(
        pool: &PgPool,
        transaction_id: Uuid,
    ) -> Result<Option<Purchase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM purchases WHERE transaction_id = $1");
        sqlx::query_as::<_, Purchase>(&query)
            .bind(transaction_id)
            .fetch_optional(pool)
            .await
    }

    /// Mark a purchase completed, incrementing the prompt's purchase
    /// counter on the first transition only.
    ///
    /// Returns the purchase plus whether this invocation performed the
    /// transition. Re-invoking on an already-completed (or refunded) event
    /// is success with no change, never a double increment. `None` means
    /// the purchase does not exist.
    pub async fn mark_completed(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<(Purchase, bool)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE purchases SET payment_status = 'completed', updated_at = now() \
             WHERE id = $1 AND payment_status IN ('pending', 'failed') \
             RETURNING {COLUMNS}"
        );
        let transitioned = sqlx::query_as::<_, Purchase>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(purchase) = transitioned {
            sqlx::query("UPDATE prompts SET purchases = purchases + 1 WHERE id = $1")
                .bind(purchase.prompt_id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            tracing::info!(
                purchase_id = purchase.id,
                prompt_id = purchase.prompt_id,
                "Purchase completed"
            );
            return Ok(Some((purchase, true)));
        }

        // Already completed (or refunded): report the current row, no change.
        Ok(Self::find_by_id(pool, id).await?.map(|p| (p, false)))
    }

    /// Mark a pending purchase failed. Any other status is left as-is and
    /// returned unchanged (duplicate webhook delivery is tolerated).
    pub async fn mark_failed(pool: &PgPool, id: DbId) -> Result<Option<Purchase>, sqlx::Error> {
        let query = format!(
            "UPDATE purchases SET payment_status = 'failed', updated_at = now() \
             WHERE id = $1 AND payment_status = 'pending' \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Purchase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match updated {
            Some(p) => Ok(Some(p)),
            None => Self::find_by_id(pool, id).await,
        }
    }

    /// Refund a completed purchase. The purchase counter is not
    /// decremented; counters are monotonic except favorites.
    pub async fn mark_refunded(pool: &PgPool, id: DbId) -> Result<Option<Purchase>, sqlx::Error> {
        let query = format!(
            "UPDATE purchases SET payment_status = 'refunded', updated_at = now() \
             WHERE id = $1 AND payment_status = 'completed' \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Purchase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match updated {
            Some(p) => Ok(Some(p)),
            None => Self::find_by_id(pool, id).await,
        }
    }

    /// Whether the user has any completed purchase of the prompt.
    pub async fn has_completed(
        pool: &PgPool,
        prompt_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM purchases \
             WHERE prompt_id = $1 AND user_id = $2 AND payment_status = 'completed')",
        )
        .bind(prompt_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Purchase>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM purchases \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Purchase>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Completed-event count the `purchases` counter must equal.
    pub async fn completed_count(pool: &PgPool, prompt_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM purchases \
             WHERE prompt_id = $1 AND payment_status = 'completed'",
        )
        .bind(prompt_id)
        .fetch_one(pool)
        .await
    }
}
