//! Handlers for the public `/products` catalog.

use axum::extract::{Path, Query, State};
use axum::Json;
use marketplace_core::error::CoreError;
use marketplace_core::types::DbId;
use marketplace_db::models::product::{Product, ProductStatus};
use marketplace_db::repositories::ProductRepo;

use crate::error::{AppError, AppResult};
use crate::query::PageParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

/// GET /api/v1/products
///
/// Public catalog listing, newest first. `stopped` products are hidden;
/// `sold_out` products remain visible.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Page<Product>>>> {
    let content = ProductRepo::list_visible(&state.pool, params.size(), params.offset()).await?;
    let total = ProductRepo::count_visible(&state.pool).await?;

    Ok(Json(DataResponse {
        data: Page::new(params.page(), params.size(), total, content),
    }))
}

/// GET /api/v1/products/{id}
///
/// Public product detail. Products a seller has stopped are not served here.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Product>>> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|p| p.status != ProductStatus::Stopped)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;

    Ok(Json(DataResponse { data: product }))
}
