//! HTTP-level integration tests for the auth endpoints.
//!
//! Tests cover login, token refresh with rotation, logout, and the
//! Bearer-token extractor.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, post_json_auth};
use marketplace_api::auth::password::hash_password;
use marketplace_db::models::member::{CreateMember, Member, MemberRole, MemberStatus};
use marketplace_db::repositories::MemberRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a test member directly in the database and return the row plus the
/// plaintext password used.
async fn create_test_member(pool: &PgPool, email: &str, role: MemberRole) -> (Member, String) {
    let password = "testPass1!";
    let hashed = hash_password(password).expect("hashing should succeed");
    let input = CreateMember {
        email: email.to_string(),
        password_hash: hashed,
        name: "Test Member".to_string(),
        phone: None,
        role,
    };
    let member = MemberRepo::create(pool, &input)
        .await
        .expect("member creation should succeed");
    (member, password.to_string())
}

/// Log in via the API and return the JSON response containing
/// `access_token`, `refresh_token`, and `member` info.
async fn login_member(app: axum::Router, email: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Auth flow tests
// ---------------------------------------------------------------------------

/// Successful login returns 200 with tokens and member info.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let (member, password) = create_test_member(&pool, "login@test.com", MemberRole::User).await;
    let app = common::build_test_app(pool.clone());

    let json = login_member(app, "login@test.com", &password).await;

    assert!(json["access_token"].is_string(), "response must contain access_token");
    assert!(json["refresh_token"].is_string(), "response must contain refresh_token");
    assert_eq!(json["token_type"], "Bearer");
    assert!(json["expires_in"].is_number(), "response must contain expires_in");
    assert_eq!(json["member"]["id"], member.id);
    assert_eq!(json["member"]["email"], "login@test.com");
    assert_eq!(json["member"]["role"], "user");

    // Login stamps last_login_at.
    let row = MemberRepo::find_by_id(&pool, member.id).await.unwrap().unwrap();
    assert!(row.last_login_at.is_some());
}

/// Login with an incorrect password returns 401.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    create_test_member(&pool, "wrongpw@test.com", MemberRole::User).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "wrongpw@test.com", "password": "incorrect1!" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Login with an unknown email returns the same 401 as a wrong password.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_unknown_email(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "ghost@test.com", "password": "whatever1!" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid email or password");
}

/// Login to a non-active account returns 403.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_withdrawn_member(pool: PgPool) {
    let (member, password) = create_test_member(&pool, "gone@test.com", MemberRole::User).await;
    MemberRepo::set_status(&pool, member.id, MemberStatus::Withdrawn)
        .await
        .expect("status update should succeed");

    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "gone@test.com", "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// A valid refresh token returns new tokens and rotates the old one out.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_token_refresh_rotates(pool: PgPool) {
    let (_member, password) = create_test_member(&pool, "refresh@test.com", MemberRole::User).await;

    let app = common::build_test_app(pool.clone());
    let login_json = login_member(app, "refresh@test.com", &password).await;
    let refresh_token = login_json["refresh_token"].as_str().unwrap();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    // Token rotation: the new refresh token must differ from the original.
    assert_ne!(
        json["refresh_token"].as_str().unwrap(),
        refresh_token,
        "refresh token must rotate on use"
    );

    // The consumed refresh token must no longer work.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Refreshing with a garbage token returns 401.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_with_invalid_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "refresh_token": "not-a-real-token" });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout revokes all sessions and returns 204 No Content.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_revokes_sessions(pool: PgPool) {
    let (_member, password) = create_test_member(&pool, "logout@test.com", MemberRole::User).await;

    let app = common::build_test_app(pool.clone());
    let login_json = login_member(app, "logout@test.com", &password).await;
    let access_token = login_json["access_token"].as_str().unwrap();
    let refresh_token = login_json["refresh_token"].as_str().unwrap();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({});
    let response = post_json_auth(app, "/api/v1/auth/logout", body, access_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The refresh token from before logout must be dead.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Extractor tests
// ---------------------------------------------------------------------------

/// Authenticated endpoints reject a missing Authorization header with 401.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = common::get(app, "/api/v1/members/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Authenticated endpoints reject a malformed token with 401.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_garbage_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/members/me", "garbage.token.value").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
