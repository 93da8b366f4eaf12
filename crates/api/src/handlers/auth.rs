//! Handlers for the `/auth` resource (login, refresh, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use marketplace_core::error::CoreError;
use marketplace_core::types::DbId;
use marketplace_db::models::member::Member;
use marketplace_db::repositories::{MemberRepo, SessionRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthMember;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub member: MemberInfo,
}

/// Public member info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct MemberInfo {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub role: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Find member by email. Unknown email and wrong password produce the
    //    same 401 so the endpoint does not leak which emails are registered.
    let member = MemberRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    // 2. Check the account status.
    if !member.status.is_active() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is not active".into(),
        )));
    }

    // 3. Verify password.
    let password_valid = verify_password(&input.password, &member.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    // 4. Stamp last_login_at.
    MemberRepo::record_login(&state.pool, member.id).await?;

    // 5. Generate tokens and create a session.
    let response = create_auth_response(&state, &member).await?;

    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Hash the provided refresh token.
    let token_hash = hash_refresh_token(&input.refresh_token);

    // 2. Find matching active session.
    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    // 3. Revoke old session (token rotation).
    SessionRepo::revoke(&state.pool, session.id).await?;

    // 4. Find the member behind the session.
    let member = MemberRepo::find_by_id(&state.pool, session.member_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Member no longer exists".into()))
        })?;

    if !member.status.is_active() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is not active".into(),
        )));
    }

    // 5. Generate new tokens and create a new session.
    let response = create_auth_response(&state, &member).await?;

    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated member. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, member: AuthMember) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_member(&state.pool, member.member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate access + refresh tokens, persist a session row, and build the response.
async fn create_auth_response(state: &AppState, member: &Member) -> AppResult<AuthResponse> {
    let role = member.role.as_str();

    let access_token = generate_access_token(member.id, &member.email, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    let session_input = marketplace_db::models::session::CreateSession {
        member_id: member.id,
        refresh_token_hash: refresh_hash,
        expires_at,
        user_agent: None,
        ip_address: None,
    };
    SessionRepo::create(&state.pool, &session_input).await?;

    let expires_in = state.config.jwt.access_token_expiry_mins * 60;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        token_type: "Bearer",
        expires_in,
        member: MemberInfo {
            id: member.id,
            email: member.email.clone(),
            name: member.name.clone(),
            role: role.to_string(),
        },
    })
}
