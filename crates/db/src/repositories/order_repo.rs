//! Repository for the `orders` and `order_items` tables.

use marketplace_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::order::{Order, OrderItem, OrderStatus};
use crate::models::product::Product;

/// Column list for `orders` shared across queries.
const ORDER_COLUMNS: &str = "id, buyer_id, status, total_price, created_at, updated_at";

/// Column list for `order_items` shared across queries.
const ITEM_COLUMNS: &str =
    "id, order_id, product_id, product_name, product_price, quantity, created_at";

/// Provides CRUD operations for orders.
pub struct OrderRepo;

impl OrderRepo {
    /// Insert an order with a single line item snapshotting the product.
    ///
    /// Must run inside the transaction that holds the product row lock so
    /// the stock decrement and the order insert commit atomically.
    pub async fn create_with_item(
        conn: &mut PgConnection,
        buyer_id: DbId,
        product: &Product,
        quantity: i32,
    ) -> Result<(Order, OrderItem), sqlx::Error> {
        let total_price = product.price * i64::from(quantity);

        let order_query = format!(
            "INSERT INTO orders (buyer_id, status, total_price)
             VALUES ($1, $2, $3)
             RETURNING {ORDER_COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&order_query)
            .bind(buyer_id)
            .bind(OrderStatus::Pending)
            .bind(total_price)
            .fetch_one(&mut *conn)
            .await?;

        let item_query = format!(
            "INSERT INTO order_items (order_id, product_id, product_name, product_price, quantity)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ITEM_COLUMNS}"
        );
        let item = sqlx::query_as::<_, OrderItem>(&item_query)
            .bind(order.id)
            .bind(product.id)
            .bind(&product.name)
            .bind(product.price)
            .bind(quantity)
            .fetch_one(&mut *conn)
            .await?;

        Ok((order, item))
    }

    /// Find an order scoped to its buyer.
    ///
    /// Scoping by buyer in the query makes another member's order
    /// indistinguishable from a missing one.
    pub async fn find_by_id_and_buyer(
        pool: &PgPool,
        id: DbId,
        buyer_id: DbId,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND buyer_id = $2");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(buyer_id)
            .fetch_optional(pool)
            .await
    }

    /// Find an order by ID with a row lock (`SELECT ... FOR UPDATE`).
    ///
    /// Must run inside a transaction. Serializes concurrent cancellations of
    /// the same order.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List a buyer's orders (newest first), paged.
    pub async fn list_by_buyer(
        pool: &PgPool,
        buyer_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE buyer_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(buyer_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a buyer's orders.
    pub async fn count_by_buyer(pool: &PgPool, buyer_id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE buyer_id = $1")
            .bind(buyer_id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    /// Fetch the items of a single order.
    pub async fn items_for_order(
        pool: &PgPool,
        order_id: DbId,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id");
        sqlx::query_as::<_, OrderItem>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await
    }

    /// Fetch the items of many orders in one round trip.
    pub async fn items_for_orders(
        pool: &PgPool,
        order_ids: &[DbId],
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY order_id, id"
        );
        sqlx::query_as::<_, OrderItem>(&query)
            .bind(order_ids)
            .fetch_all(pool)
            .await
    }

    /// Fetch the items of an order inside a caller-managed transaction.
    pub async fn items_for_order_tx(
        conn: &mut PgConnection,
        order_id: DbId,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id");
        sqlx::query_as::<_, OrderItem>(&query)
            .bind(order_id)
            .fetch_all(conn)
            .await
    }

    /// Set the order status on a locked row. Must run in the same
    /// transaction that acquired the lock via [`Self::find_by_id_for_update`].
    pub async fn set_status(
        conn: &mut PgConnection,
        id: DbId,
        status: OrderStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(conn)
            .await?;
        Ok(())
    }
}
