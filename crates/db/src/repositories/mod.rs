//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept `&PgPool` as the first argument. Methods that must run inside a
//! caller-managed transaction (row locks, multi-statement writes) accept
//! `&mut PgConnection` instead.

pub mod member_repo;
pub mod order_repo;
pub mod product_repo;
pub mod session_repo;

pub use member_repo::MemberRepo;
pub use order_repo::OrderRepo;
pub use product_repo::ProductRepo;
pub use session_repo::SessionRepo;
