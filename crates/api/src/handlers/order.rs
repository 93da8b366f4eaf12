//! Handlers for the `/orders` resource.
//!
//! Order placement and cancellation run inside a single transaction with the
//! affected product rows locked via `SELECT ... FOR UPDATE`, so concurrent
//! orders can never oversell. A 3 second `lock_timeout` bounds the wait; when
//! it expires PostgreSQL raises `55P03`, which the error layer maps to 409.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use marketplace_core::error::CoreError;
use marketplace_core::types::DbId;
use marketplace_db::models::order::{Order, OrderItem, OrderStatus};
use marketplace_db::models::product::ProductStatus;
use marketplace_db::repositories::{OrderRepo, ProductRepo};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthMember;
use crate::query::PageParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

/// How long a transaction waits for a contended product/order row lock.
const LOCK_TIMEOUT: &str = "3s";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /orders`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub product_id: DbId,

    #[validate(range(min = 1, message = "must be at least 1"))]
    pub quantity: i32,
}

/// An order together with its item lines.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/orders
///
/// Place an order for a single product. Returns 201 with the created order.
pub async fn create(
    State(state): State<AppState>,
    member: AuthMember,
    Json(input): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<OrderResponse>>)> {
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    set_lock_timeout(&mut tx).await?;

    // Lock the product row for the duration of the transaction.
    let product = ProductRepo::find_by_id_for_update(&mut tx, input.product_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id: input.product_id,
        }))?;

    if product.status == ProductStatus::Stopped {
        return Err(AppError::Core(CoreError::Validation(
            "Product is no longer for sale".into(),
        )));
    }

    if product.stock_quantity < input.quantity {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Insufficient stock: {} available, {} requested",
            product.stock_quantity, input.quantity
        ))));
    }

    // Decrement stock and recompute the product status under the lock.
    let new_stock = product.stock_quantity - input.quantity;
    let new_status = product.status.after_stock_change(new_stock);
    ProductRepo::update_stock(&mut tx, product.id, new_stock, new_status).await?;

    let (order, item) =
        OrderRepo::create_with_item(&mut tx, member.member_id, &product, input.quantity).await?;

    tx.commit().await?;

    tracing::info!(
        order_id = order.id,
        buyer_id = member.member_id,
        product_id = product.id,
        quantity = input.quantity,
        "Order placed"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: OrderResponse {
                order,
                items: vec![item],
            },
        }),
    ))
}

/// GET /api/v1/orders
///
/// List the authenticated member's own orders with items, newest first.
pub async fn list(
    State(state): State<AppState>,
    member: AuthMember,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Page<OrderResponse>>>> {
    let orders =
        OrderRepo::list_by_buyer(&state.pool, member.member_id, params.size(), params.offset())
            .await?;
    let total = OrderRepo::count_by_buyer(&state.pool, member.member_id).await?;

    let order_ids: Vec<DbId> = orders.iter().map(|o| o.id).collect();
    let mut items_by_order: HashMap<DbId, Vec<OrderItem>> = HashMap::new();
    for item in OrderRepo::items_for_orders(&state.pool, &order_ids).await? {
        items_by_order.entry(item.order_id).or_default().push(item);
    }

    let content = orders
        .into_iter()
        .map(|order| {
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            OrderResponse { order, items }
        })
        .collect();

    Ok(Json(DataResponse {
        data: Page::new(params.page(), params.size(), total, content),
    }))
}

/// GET /api/v1/orders/{id}
///
/// Fetch one of the member's own orders. Another member's order is
/// indistinguishable from a missing one (404).
pub async fn get(
    State(state): State<AppState>,
    member: AuthMember,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<OrderResponse>>> {
    let order = OrderRepo::find_by_id_and_buyer(&state.pool, id, member.member_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Order",
            id,
        }))?;

    let items = OrderRepo::items_for_order(&state.pool, order.id).await?;

    Ok(Json(DataResponse {
        data: OrderResponse { order, items },
    }))
}

/// POST /api/v1/orders/{id}/cancel
///
/// Cancel a `pending` or `paid` order, restoring the reserved stock.
/// Returns 204.
pub async fn cancel(
    State(state): State<AppState>,
    member: AuthMember,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    set_lock_timeout(&mut tx).await?;

    // Lock the order row so concurrent cancels serialize.
    let order = OrderRepo::find_by_id_for_update(&mut tx, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Order",
            id,
        }))?;

    if order.buyer_id != member.member_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this order".into(),
        )));
    }

    if order.status == OrderStatus::Cancelled {
        return Err(AppError::Core(CoreError::Validation(
            "Order is already cancelled".into(),
        )));
    }

    if !order.status.is_cancellable() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Order in status {:?} cannot be cancelled",
            order.status
        ))));
    }

    // Restore stock for every item, each under its own product row lock.
    let items = OrderRepo::items_for_order_tx(&mut tx, order.id).await?;
    for item in &items {
        // Skip products the seller has since deleted.
        let Some(product) = ProductRepo::find_by_id_for_update(&mut tx, item.product_id).await?
        else {
            continue;
        };

        let new_stock = product.stock_quantity + item.quantity;
        let new_status = product.status.after_stock_change(new_stock);
        ProductRepo::update_stock(&mut tx, product.id, new_stock, new_status).await?;
    }

    OrderRepo::set_status(&mut tx, order.id, OrderStatus::Cancelled).await?;

    tx.commit().await?;

    tracing::info!(order_id = id, buyer_id = member.member_id, "Order cancelled");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bound row-lock waits for the current transaction.
///
/// `SET LOCAL` scopes the setting to the transaction, so the pooled
/// connection is unaffected after commit/rollback.
async fn set_lock_timeout(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    sqlx::query(&format!("SET LOCAL lock_timeout = '{LOCK_TIMEOUT}'"))
        .execute(conn)
        .await?;
    Ok(())
}
