//! Repository for the `products` table.

use marketplace_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::product::{CreateProduct, Product, ProductStatus, UpdateProduct};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, price, stock_quantity, status, seller_id, created_at, updated_at";

/// Provides CRUD operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (name, price, stock_quantity, status, seller_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let status = ProductStatus::Selling.after_stock_change(input.stock_quantity);
        sqlx::query_as::<_, Product>(&query)
            .bind(&input.name)
            .bind(input.price)
            .bind(input.stock_quantity)
            .bind(status)
            .bind(input.seller_id)
            .fetch_one(pool)
            .await
    }

    /// Find a product by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a product by ID with a row lock (`SELECT ... FOR UPDATE`).
    ///
    /// Must run inside a transaction; the lock is held until the transaction
    /// ends. Used to serialize stock changes during order placement and
    /// cancellation.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List catalog-visible products (everything except `stopped`),
    /// newest first, paged.
    pub async fn list_visible(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE status <> $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(ProductStatus::Stopped)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count catalog-visible products.
    pub async fn count_visible(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products WHERE status <> $1")
            .bind(ProductStatus::Stopped)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    /// List a seller's products (newest first), paged.
    pub async fn list_by_seller(
        pool: &PgPool,
        seller_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE seller_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(seller_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a seller's products.
    pub async fn count_by_seller(pool: &PgPool, seller_id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products WHERE seller_id = $1")
            .bind(seller_id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    /// Update a product. Only non-`None` fields in `input` are applied; the
    /// caller passes the recomputed `status` when the stock changed.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
        status: ProductStatus,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET
                name = COALESCE($2, name),
                price = COALESCE($3, price),
                stock_quantity = COALESCE($4, stock_quantity),
                status = $5,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.price)
            .bind(input.stock_quantity)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Set stock and status on a locked row. Must run in the same
    /// transaction that acquired the lock via [`Self::find_by_id_for_update`].
    pub async fn update_stock(
        conn: &mut PgConnection,
        id: DbId,
        stock_quantity: i32,
        status: ProductStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE products SET stock_quantity = $2, status = $3, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(stock_quantity)
        .bind(status)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Delete a product. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
