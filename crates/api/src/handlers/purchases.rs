//! Handlers for the purchase flow.
//!
//! A purchase opens in `pending`; the payment gateway later confirms or
//! rejects it through the transaction-id addressed transition endpoints.
//! Those endpoints are retried by the gateway, so they tolerate duplicate
//! delivery: re-confirming a completed purchase is success with no change.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use promptmart_core::catalog::price_type;
use promptmart_core::error::CoreError;
use promptmart_core::types::DbId;
use promptmart_db::models::prompt::Prompt;
use promptmart_db::models::purchase::CreatePurchase;
use promptmart_db::repositories::{PromptRepo, PurchaseRepo};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::identity::Identity;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/prompts/{id}/purchase
///
/// Open a pending purchase of a paid entry at its current price. Free
/// entries are not purchasable, authors cannot buy their own entries, and
/// a user with a completed purchase cannot buy again.
pub async fn create_purchase(
    identity: Identity,
    State(state): State<AppState>,
    Path(prompt_id): Path<DbId>,
    Json(input): Json<CreatePurchase>,
) -> AppResult<impl IntoResponse> {
    let prompt = require_published(&state, prompt_id).await?;

    if prompt.price_type == price_type::FREE {
        return Err(AppError::Core(CoreError::InvariantViolation(
            "free entries cannot be purchased".into(),
        )));
    }
    if prompt.author_id == identity.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "authors cannot purchase their own entries".into(),
        )));
    }

    let already = PurchaseRepo::has_completed(&state.pool, prompt_id, identity.user_id).await?;
    if already {
        return Err(AppError::Core(CoreError::DuplicateAction(
            "entry already purchased by this user".into(),
        )));
    }

    let purchase = PurchaseRepo::create(
        &state.pool,
        prompt_id,
        identity.user_id,
        prompt.price,
        input.external_ref.as_deref(),
    )
    .await?;

    tracing::info!(
        purchase_id = purchase.id,
        prompt_id,
        user_id = identity.user_id,
        "Purchase opened"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: purchase })))
}

/// GET /api/v1/purchases/mine
///
/// The caller's purchases, newest first, every status included.
pub async fn list_mine(
    identity: Identity,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let purchases = PurchaseRepo::list_for_user(&state.pool, identity.user_id).await?;

    Ok(Json(DataResponse { data: purchases }))
}

/// POST /api/v1/purchases/{transaction_id}/complete
///
/// Gateway confirmation. Safe to retry: the prompt's purchase counter is
/// incremented only by the invocation that actually transitions the
/// status.
pub async fn complete_purchase(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let purchase = find_by_transaction(&state, transaction_id).await?;

    let (purchase, _transitioned) = PurchaseRepo::mark_completed(&state.pool, purchase.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("purchase {transaction_id} not found")))?;

    Ok(Json(DataResponse { data: purchase }))
}

/// POST /api/v1/purchases/{transaction_id}/fail
///
/// Gateway rejection. Only a pending purchase moves to `failed`; anything
/// else is returned unchanged.
pub async fn fail_purchase(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let purchase = find_by_transaction(&state, transaction_id).await?;

    let purchase = PurchaseRepo::mark_failed(&state.pool, purchase.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("purchase {transaction_id} not found")))?;

    tracing::info!(purchase_id = purchase.id, "Purchase failed");

    Ok(Json(DataResponse { data: purchase }))
}

/// POST /api/v1/purchases/{transaction_id}/refund
///
/// Refund a completed purchase. Terminal; the purchase counter is not
/// decremented.
pub async fn refund_purchase(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let purchase = find_by_transaction(&state, transaction_id).await?;

    let purchase = PurchaseRepo::mark_refunded(&state.pool, purchase.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("purchase {transaction_id} not found")))?;

    tracing::info!(purchase_id = purchase.id, "Purchase refunded");

    Ok(Json(DataResponse { data: purchase }))
}

async fn find_by_transaction(
    state: &AppState,
    transaction_id: Uuid,
) -> AppResult<promptmart_db::models::purchase::Purchase> {
    PurchaseRepo::find_by_transaction_id(&state.pool, transaction_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("purchase {transaction_id} not found")))
}

async fn require_published(state: &AppState, prompt_id: DbId) -> AppResult<Prompt> {
    PromptRepo::find_by_id(&state.pool, prompt_id)
        .await?
        .filter(|p| p.status == promptmart_core::catalog::status::PUBLISHED && p.is_active)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Prompt",
            id: prompt_id,
        }))
}
