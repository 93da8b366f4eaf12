pub mod auth;
pub mod health;
pub mod member;
pub mod order;
pub mod product;
pub mod seller;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /members/signup                 signup (public, POST)
/// /members/check-email            email availability (public, GET)
/// /members/me                     own profile (requires auth, GET)
///
/// /auth/login                     login (public)
/// /auth/refresh                   refresh (public)
/// /auth/logout                    logout (requires auth)
///
/// /products                       public catalog, paged (GET)
/// /products/{id}                  public product detail (GET)
///
/// /seller/products                list own, create (seller/admin)
/// /seller/products/{id}           update, delete (seller/admin, owner only)
///
/// /orders                         list own paged, place order (requires auth)
/// /orders/{id}                    own order detail (requires auth)
/// /orders/{id}/cancel             cancel own order (requires auth, POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Member signup and profile.
        .nest("/members", member::router())
        // Authentication routes (login, refresh, logout).
        .nest("/auth", auth::router())
        // Public product catalog.
        .nest("/products", product::router())
        // Seller-side product management.
        .nest("/seller/products", seller::router())
        // Order placement, listing, cancellation.
        .nest("/orders", order::router())
}
