//! Route definitions for the `/orders` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::order;
use crate::state::AppState;

/// Routes mounted at `/orders`. All require authentication.
///
/// ```text
/// GET  /              -> list own orders (paged)
/// POST /              -> place an order
/// GET  /{id}          -> own order detail
/// POST /{id}/cancel   -> cancel own order
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(order::list).post(order::create))
        .route("/{id}", get(order::get))
        .route("/{id}/cancel", post(order::cancel))
}
