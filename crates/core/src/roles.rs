//! Well-known role name constants.
//!
//! These must match the `ck_members_role` check constraint in
//! `20260301000001_create_members_table.sql`.

pub const ROLE_USER: &str = "user";
pub const ROLE_SELLER: &str = "seller";
pub const ROLE_ADMIN: &str = "admin";
