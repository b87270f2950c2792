//! Route definitions for review-addressed operations, mounted at `/reviews`.
//!
//! ```text
//! POST /{id}/helpful -> add_helpful_vote
//! ```
//!
//! Listing and upserting reviews live under `/prompts/{id}/reviews`.

use axum::routing::post;
use axum::Router;

use crate::handlers::reviews;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/helpful", post(reviews::add_helpful_vote))
}
