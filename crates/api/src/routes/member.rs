//! Route definitions for the `/members` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::member;
use crate::state::AppState;

/// Routes mounted at `/members`.
///
/// ```text
/// POST /signup        -> signup (public)
/// GET  /check-email   -> email availability (public)
/// GET  /me            -> own profile (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(member::signup))
        .route("/check-email", get(member::check_email))
        .route("/me", get(member::me))
}
