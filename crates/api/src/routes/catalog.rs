//! Route definitions for the public catalog, mounted at `/catalog`.
//!
//! ```text
//! GET /search     -> search
//! GET /featured   -> featured
//! GET /trending   -> trending
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(catalog::search))
        .route("/featured", get(catalog::featured))
        .route("/trending", get(catalog::trending))
}
