//! HTTP handlers, grouped per resource.

pub mod auth;
pub mod member;
pub mod order;
pub mod product;
pub mod seller_product;
