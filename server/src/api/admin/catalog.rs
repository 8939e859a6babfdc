//! Admin catalog management: products and categories

use axum::Json;
use axum::extract::{Path, Query, State};
use serde_json::json;

use hanmall_shared::error::{ApiResponse, AppError, ErrorCode};
use hanmall_shared::models::{
    Category, CategoryCreate, CategoryUpdate, Product, ProductCreate, ProductListItem,
    ProductUpdate,
};

use crate::api::catalog::ListProductsQuery;
use crate::db;
use crate::db::products::ProductFilter;
use crate::error::ServiceResult;
use crate::events;
use crate::state::AppState;

use hanmall_shared::events::EventKind;

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> ServiceResult<Json<ApiResponse<Vec<ProductListItem>>>> {
    let filter = ProductFilter {
        category_id: query.category_id,
        include_inactive: true,
        limit: query.limit.unwrap_or(50).clamp(1, 200),
        offset: query.offset.unwrap_or(0).max(0),
    };
    let products = db::products::list_products(&state.pool, &filter).await?;
    Ok(Json(ApiResponse::success(products)))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<ProductCreate>,
) -> ServiceResult<Json<ApiResponse<Product>>> {
    validate_product_fields(&req.name, req.stock)?;
    let product = db::products::create_product(&state.pool, &req).await?;
    tracing::info!(product_id = product.id, "product created");
    Ok(Json(ApiResponse::success(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ProductUpdate>,
) -> ServiceResult<Json<ApiResponse<Product>>> {
    if let Some(stock) = req.stock {
        if stock < 0 {
            return Err(AppError::validation("Stock cannot be negative").into());
        }
    }
    let product = db::products::update_product(&state.pool, id, &req)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    if req.stock.is_some() {
        publish_inventory(&state.events, product.id);
    }
    Ok(Json(ApiResponse::success(product)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<ApiResponse<()>>> {
    if !db::products::delete_product(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::ProductNotFound).into());
    }
    tracing::info!(product_id = id, "product deleted");
    Ok(Json(ApiResponse::ok()))
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> ServiceResult<Json<ApiResponse<Vec<Category>>>> {
    let categories = db::categories::list_categories(&state.pool, false).await?;
    Ok(Json(ApiResponse::success(categories)))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CategoryCreate>,
) -> ServiceResult<Json<ApiResponse<Category>>> {
    if req.name.trim().is_empty() || req.slug.trim().is_empty() {
        return Err(AppError::validation("Category name and slug are required").into());
    }
    let category = db::categories::create_category(&state.pool, &req).await?;
    Ok(Json(ApiResponse::success(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<CategoryUpdate>,
) -> ServiceResult<Json<ApiResponse<Category>>> {
    let category = db::categories::update_category(&state.pool, id, &req)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    Ok(Json(ApiResponse::success(category)))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<ApiResponse<()>>> {
    if !db::categories::delete_category(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::CategoryNotFound).into());
    }
    Ok(Json(ApiResponse::ok()))
}

fn validate_product_fields(name: &str, stock: i32) -> Result<(), crate::error::ServiceError> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Product name is required").into());
    }
    if stock < 0 {
        return Err(AppError::validation("Stock cannot be negative").into());
    }
    Ok(())
}

fn publish_inventory(events: &events::EventHub, product_id: i64) {
    events.publish(EventKind::InventoryUpdate, json!({ "product_id": product_id }));
}
