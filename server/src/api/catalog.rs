//! Public catalog browsing

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use hanmall_shared::error::{ApiResponse, AppError, ErrorCode};
use hanmall_shared::models::{Category, Product, ProductListItem};

use crate::db;
use crate::db::products::ProductFilter;
use crate::error::ServiceResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub category_id: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> ServiceResult<Json<ApiResponse<Vec<ProductListItem>>>> {
    let filter = ProductFilter {
        category_id: query.category_id,
        include_inactive: false,
        limit: query.limit.unwrap_or(50).clamp(1, 200),
        offset: query.offset.unwrap_or(0).max(0),
    };
    let products = db::products::list_products(&state.pool, &filter).await?;
    Ok(Json(ApiResponse::success(products)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<ApiResponse<Product>>> {
    let product = db::products::get_product(&state.pool, id)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(Json(ApiResponse::success(product)))
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> ServiceResult<Json<ApiResponse<Vec<Category>>>> {
    let categories = db::categories::list_categories(&state.pool, true).await?;
    Ok(Json(ApiResponse::success(categories)))
}
