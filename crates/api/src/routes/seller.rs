//! Route definitions for seller-side product management.

use axum::routing::get;
use axum::Router;

use crate::handlers::seller_product;
use crate::state::AppState;

/// Routes mounted at `/seller/products`. All require seller or admin role.
///
/// ```text
/// GET    /       -> list own products
/// POST   /       -> create product
/// PUT    /{id}   -> update product (owner only)
/// DELETE /{id}   -> delete product (owner only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(seller_product::list).post(seller_product::create),
        )
        .route(
            "/{id}",
            axum::routing::put(seller_product::update).delete(seller_product::delete),
        )
}
