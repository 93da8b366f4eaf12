//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthMember`] and rejects requests whose role does
//! not meet the minimum requirement. Use these in route handlers to enforce
//! authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use marketplace_core::error::CoreError;
use marketplace_core::roles::{ROLE_ADMIN, ROLE_SELLER};

use super::auth::AuthMember;
use crate::error::AppError;
use crate::state::AppState;

/// Requires `seller` or `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn seller_only(RequireSeller(member): RequireSeller) -> AppResult<Json<()>> {
///     // member is guaranteed to be a seller or admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireSeller(pub AuthMember);

impl FromRequestParts<AppState> for RequireSeller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let member = AuthMember::from_request_parts(parts, state).await?;
        if member.role != ROLE_ADMIN && member.role != ROLE_SELLER {
            return Err(AppError::Core(CoreError::Forbidden(
                "Seller or Admin role required".into(),
            )));
        }
        Ok(RequireSeller(member))
    }
}
