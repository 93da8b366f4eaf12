//! Repository for the `members` table.

use marketplace_core::types::DbId;
use sqlx::PgPool;

use crate::models::member::{CreateMember, Member, MemberStatus};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, name, phone, role, status, \
                        last_login_at, created_at, updated_at";

/// Provides CRUD operations for members.
pub struct MemberRepo;

impl MemberRepo {
    /// Insert a new member, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMember) -> Result<Member, sqlx::Error> {
        let query = format!(
            "INSERT INTO members (email, password_hash, name, phone, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a member by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE id = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a member by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE email = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Check whether an email is already registered.
    pub async fn exists_by_email(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM members WHERE email = $1)")
                .bind(email)
                .fetch_one(pool)
                .await?;
        Ok(exists.0)
    }

    /// Set the account status. Returns `true` if the row was updated.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: MemberStatus,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE members SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(status)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a successful login by stamping `last_login_at`.
    pub async fn record_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE members SET last_login_at = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
