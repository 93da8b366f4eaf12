//! Shared domain primitives for the marketplace backend.
//!
//! - [`types`] -- database id and timestamp aliases.
//! - [`error`] -- the domain-level error enum.
//! - [`roles`] -- well-known role name constants.
//! - [`validation`] -- pure input validation rules (password, phone).

pub mod error;
pub mod roles;
pub mod types;
pub mod validation;
