//! Member entity model and DTOs.

use marketplace_core::roles::{ROLE_ADMIN, ROLE_SELLER, ROLE_USER};
use marketplace_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::text_enum;

/// Member role, stored as TEXT in the `members.role` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    User,
    Seller,
    Admin,
}

text_enum!(MemberRole {
    User => ROLE_USER,
    Seller => ROLE_SELLER,
    Admin => ROLE_ADMIN,
});

/// Member account status, stored as TEXT in the `members.status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    /// Normal, usable account.
    Active,
    /// Deactivated by an administrator.
    Inactive,
    /// Dormant after prolonged inactivity.
    Dormant,
    /// The member has withdrawn from the service.
    Withdrawn,
}

text_enum!(MemberStatus {
    Active => "active",
    Inactive => "inactive",
    Dormant => "dormant",
    Withdrawn => "withdrawn",
});

impl MemberStatus {
    /// Whether the account may log in and act.
    pub fn is_active(self) -> bool {
        self == MemberStatus::Active
    }
}

/// Full member row from the `members` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`MemberResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Member {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe member representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct MemberResponse {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<Member> for MemberResponse {
    fn from(m: Member) -> Self {
        MemberResponse {
            id: m.id,
            email: m.email,
            name: m.name,
            phone: m.phone,
            role: m.role,
            status: m.status,
            last_login_at: m.last_login_at,
            created_at: m.created_at,
        }
    }
}

/// DTO for inserting a new member.
pub struct CreateMember {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: MemberRole,
}
