//! Route definitions for the public `/products` catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::product;
use crate::state::AppState;

/// Routes mounted at `/products`.
///
/// ```text
/// GET /       -> paged catalog (public)
/// GET /{id}   -> product detail (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(product::list))
        .route("/{id}", get(product::get))
}
