use promptmart_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `purchases` table.
///
/// `transaction_id` is the stable reference handed to the payment
/// collaborator; confirmation webhooks address the event through it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Purchase {
    pub id: DbId,
    pub prompt_id: DbId,
    pub user_id: DbId,
    pub amount: Decimal,
    pub payment_status: String,
    pub transaction_id: Uuid,
    pub external_ref: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for opening a purchase. The amount is taken from the prompt's
/// current price, not from the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePurchase {
    /// Gateway-side reference (e.g. a payment-intent id), if already known.
    pub external_ref: Option<String>,
}
