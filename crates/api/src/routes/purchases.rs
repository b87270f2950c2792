//! Route definitions for purchases, mounted at `/purchases`.
//!
//! Transition endpoints address by the gateway-facing transaction id, not
//! the row id; they are the retry-tolerant webhook surface.
//!
//! ```text
//! GET  /mine                          -> list_mine
//! POST /{transaction_id}/complete     -> complete_purchase
//! POST /{transaction_id}/fail         -> fail_purchase
//! POST /{transaction_id}/refund       -> refund_purchase
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::purchases;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mine", get(purchases::list_mine))
        .route(
            "/{transaction_id}/complete",
            post(purchases::complete_purchase),
        )
        .route("/{transaction_id}/fail", post(purchases::fail_purchase))
        .route("/{transaction_id}/refund", post(purchases::refund_purchase))
}
