//! Member session model and DTOs.

use marketplace_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `member_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct MemberSession {
    pub id: DbId,
    pub member_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new member session.
pub struct CreateSession {
    pub member_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}
