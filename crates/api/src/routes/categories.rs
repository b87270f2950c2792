//! Route definitions for categories, mounted at `/categories`.
//!
//! The GET addresses by slug; PUT and DELETE address by numeric id. They
//! share one path parameter because the router requires a consistent name
//! per position.
//!
//! ```text
//! GET    /         -> list_categories
//! POST   /         -> create_category
//! GET    /{slug}          -> get_category
//! PUT    /{slug}          -> update_category (id-addressed)
//! DELETE /{slug}          -> delete_category (id-addressed)
//! GET    /{slug}/prompts  -> list_category_prompts
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/{slug}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/{slug}/prompts", get(categories::list_category_prompts))
}
