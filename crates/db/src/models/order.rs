//! Order and order item entity models.

use marketplace_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::text_enum;

/// Order lifecycle status, stored as TEXT in the `orders.status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, awaiting payment.
    Pending,
    /// Paid, awaiting shipment.
    Paid,
    Shipping,
    Delivered,
    Cancelled,
}

text_enum!(OrderStatus {
    Pending => "pending",
    Paid => "paid",
    Shipping => "shipping",
    Delivered => "delivered",
    Cancelled => "cancelled",
});

impl OrderStatus {
    /// Only orders that have not yet shipped can be cancelled.
    pub fn is_cancellable(self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Paid)
    }
}

/// A row from the `orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub buyer_id: DbId,
    pub status: OrderStatus,
    pub total_price: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `order_items` table.
///
/// `product_name` and `product_price` are snapshots taken at purchase time.
#[derive(Debug, Clone, FromRow)]
pub struct OrderItem {
    pub id: DbId,
    pub order_id: DbId,
    pub product_id: DbId,
    pub product_name: String,
    pub product_price: i64,
    pub quantity: i32,
    pub created_at: Timestamp,
}

impl OrderItem {
    /// Line subtotal (unit price at purchase time times quantity).
    pub fn subtotal(&self) -> i64 {
        self.product_price * i64::from(self.quantity)
    }
}

// Serialized by hand so the computed `subtotal` appears next to the row
// columns in API payloads.
impl Serialize for OrderItem {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("OrderItem", 8)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("order_id", &self.order_id)?;
        s.serialize_field("product_id", &self.product_id)?;
        s.serialize_field("product_name", &self.product_name)?;
        s.serialize_field("product_price", &self.product_price)?;
        s.serialize_field("quantity", &self.quantity)?;
        s.serialize_field("subtotal", &self.subtotal())?;
        s.serialize_field("created_at", &self.created_at)?;
        s.end()
    }
}
