//! Handlers for the `/members` resource (signup, email check, profile).

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use marketplace_core::error::CoreError;
use marketplace_core::validation::{validate_password, validate_phone};
use marketplace_db::models::member::{CreateMember, MemberResponse, MemberRole};
use marketplace_db::repositories::MemberRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthMember;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /members/signup`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(
        email(message = "must be a valid email address"),
        length(max = 50, message = "must be at most 50 characters")
    )]
    pub email: String,

    #[validate(custom(function = validate_password))]
    pub password: String,

    #[validate(length(min = 2, max = 50, message = "must be 2-50 characters"))]
    pub name: String,

    #[validate(custom(function = validate_phone))]
    pub phone: Option<String>,

    /// Requested role. `admin` cannot be self-assigned.
    #[serde(default)]
    pub role: Option<SignupRole>,
}

/// Roles a member may register as.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignupRole {
    User,
    Seller,
}

impl From<SignupRole> for MemberRole {
    fn from(role: SignupRole) -> Self {
        match role {
            SignupRole::User => MemberRole::User,
            SignupRole::Seller => MemberRole::Seller,
        }
    }
}

/// Query parameters for `GET /members/check-email`.
#[derive(Debug, Deserialize)]
pub struct CheckEmailParams {
    pub email: String,
}

/// Response body for `GET /members/check-email`.
#[derive(Debug, Serialize)]
pub struct CheckEmailResponse {
    pub email: String,
    pub available: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/members/signup
///
/// Register a new member. Returns 201 with the created member on success,
/// 400 on validation failure, 409 if the email is already taken.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<MemberResponse>>)> {
    input.validate()?;

    // Early duplicate check for a friendly message. The uq_members_email
    // constraint still backstops concurrent signups.
    if MemberRepo::exists_by_email(&state.pool, &input.email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Email is already registered".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let role = input.role.map(MemberRole::from).unwrap_or(MemberRole::User);

    let create = CreateMember {
        email: input.email,
        password_hash,
        name: input.name,
        phone: input.phone,
        role,
    };
    let member = MemberRepo::create(&state.pool, &create).await?;

    tracing::info!(member_id = member.id, "Member registered");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: member.into(),
        }),
    ))
}

/// GET /api/v1/members/check-email?email=
///
/// Report whether an email address is still available for signup.
pub async fn check_email(
    State(state): State<AppState>,
    Query(params): Query<CheckEmailParams>,
) -> AppResult<Json<DataResponse<CheckEmailResponse>>> {
    let taken = MemberRepo::exists_by_email(&state.pool, &params.email).await?;

    Ok(Json(DataResponse {
        data: CheckEmailResponse {
            email: params.email,
            available: !taken,
        },
    }))
}

/// GET /api/v1/members/me
///
/// Return the authenticated member's own profile.
pub async fn me(
    State(state): State<AppState>,
    member: AuthMember,
) -> AppResult<Json<DataResponse<MemberResponse>>> {
    let row = MemberRepo::find_by_id(&state.pool, member.member_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Member",
            id: member.member_id,
        }))?;

    Ok(Json(DataResponse { data: row.into() }))
}
