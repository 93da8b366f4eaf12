//! Product entity model, status rules, and DTOs.

use marketplace_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::text_enum;

/// Product sale status, stored as TEXT in the `products.status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// Available for purchase.
    Selling,
    /// Stock is exhausted.
    SoldOut,
    /// The seller has suspended sales.
    Stopped,
}

text_enum!(ProductStatus {
    Selling => "selling",
    SoldOut => "sold_out",
    Stopped => "stopped",
});

impl ProductStatus {
    /// Recompute the status after a stock change.
    ///
    /// Reaching zero flips `selling` to `sold_out`; restocking above zero
    /// flips `sold_out` back to `selling`. A manually `stopped` product is
    /// never changed automatically.
    pub fn after_stock_change(self, new_quantity: i32) -> ProductStatus {
        match self {
            ProductStatus::Selling if new_quantity == 0 => ProductStatus::SoldOut,
            ProductStatus::SoldOut if new_quantity > 0 => ProductStatus::Selling,
            other => other,
        }
    }
}

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub price: i64,
    pub stock_quantity: i32,
    pub status: ProductStatus,
    pub seller_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new product.
pub struct CreateProduct {
    pub name: String,
    pub price: i64,
    pub stock_quantity: i32,
    pub seller_id: DbId,
}

/// DTO for updating a product. Only non-`None` fields are applied.
#[derive(Debug, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub stock_quantity: Option<i32>,
}
