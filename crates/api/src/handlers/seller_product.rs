//! Handlers for seller-side product management (`/seller/products`).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use marketplace_core::error::CoreError;
use marketplace_core::roles::ROLE_ADMIN;
use marketplace_core::types::DbId;
use marketplace_db::models::product::{CreateProduct, Product, UpdateProduct};
use marketplace_db::repositories::ProductRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthMember;
use crate::middleware::rbac::RequireSeller;
use crate::query::PageParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /seller/products`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,

    #[validate(range(min = 0, message = "must not be negative"))]
    pub price: i64,

    #[validate(range(min = 0, message = "must not be negative"))]
    pub stock_quantity: i32,
}

/// Request body for `PUT /seller/products/{id}`. All fields optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(range(min = 0, message = "must not be negative"))]
    pub price: Option<i64>,

    #[validate(range(min = 0, message = "must not be negative"))]
    pub stock_quantity: Option<i32>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/seller/products
///
/// Create a product owned by the authenticated seller. Returns 201.
pub async fn create(
    State(state): State<AppState>,
    RequireSeller(member): RequireSeller,
    Json(input): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Product>>)> {
    input.validate()?;

    let create = CreateProduct {
        name: input.name,
        price: input.price,
        stock_quantity: input.stock_quantity,
        seller_id: member.member_id,
    };
    let product = ProductRepo::create(&state.pool, &create).await?;

    tracing::info!(product_id = product.id, seller_id = member.member_id, "Product created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// GET /api/v1/seller/products
///
/// List the authenticated seller's own products (all statuses), newest first.
pub async fn list(
    State(state): State<AppState>,
    RequireSeller(member): RequireSeller,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Page<Product>>>> {
    let content = ProductRepo::list_by_seller(
        &state.pool,
        member.member_id,
        params.size(),
        params.offset(),
    )
    .await?;
    let total = ProductRepo::count_by_seller(&state.pool, member.member_id).await?;

    Ok(Json(DataResponse {
        data: Page::new(params.page(), params.size(), total, content),
    }))
}

/// PUT /api/v1/seller/products/{id}
///
/// Update a product. Changing the stock recomputes the status unless the
/// seller has stopped the product.
pub async fn update(
    State(state): State<AppState>,
    RequireSeller(member): RequireSeller,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProductRequest>,
) -> AppResult<Json<DataResponse<Product>>> {
    input.validate()?;

    let existing = find_owned(&state, id, &member).await?;

    let status = match input.stock_quantity {
        Some(quantity) => existing.status.after_stock_change(quantity),
        None => existing.status,
    };

    let update = UpdateProduct {
        name: input.name,
        price: input.price,
        stock_quantity: input.stock_quantity,
    };
    let product = ProductRepo::update(&state.pool, id, &update, status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;

    Ok(Json(DataResponse { data: product }))
}

/// DELETE /api/v1/seller/products/{id}
///
/// Delete a product. Returns 204.
pub async fn delete(
    State(state): State<AppState>,
    RequireSeller(member): RequireSeller,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_owned(&state, id, &member).await?;

    ProductRepo::delete(&state.pool, id).await?;

    tracing::info!(product_id = id, seller_id = member.member_id, "Product deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a product and enforce ownership. Admins may act on any product.
async fn find_owned(state: &AppState, id: DbId, member: &AuthMember) -> AppResult<Product> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;

    if product.seller_id != member.member_id && member.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this product".into(),
        )));
    }

    Ok(product)
}
