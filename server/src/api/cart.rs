//! Cart endpoints (per authenticated user)

use axum::extract::{Path, State};
use axum::{Extension, Json};

use hanmall_shared::error::{ApiResponse, AppError, ErrorCode};
use hanmall_shared::models::{CartItem, CartItemAdd, CartItemQuantity, CartItemView};

use crate::auth::Identity;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ServiceResult<Json<ApiResponse<Vec<CartItemView>>>> {
    let items = db::carts::list_items(&state.pool, identity.user_id).await?;
    Ok(Json(ApiResponse::success(items)))
}

pub async fn add_item(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CartItemAdd>,
) -> ServiceResult<Json<ApiResponse<CartItem>>> {
    if req.quantity <= 0 {
        return Err(AppError::new(ErrorCode::InvalidQuantity).into());
    }
    let product = db::products::get_product(&state.pool, req.product_id)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    if product.stock < req.quantity {
        return Err(AppError::new(ErrorCode::InsufficientStock)
            .with_detail("available", product.stock)
            .into());
    }

    let item =
        db::carts::add_item(&state.pool, identity.user_id, req.product_id, req.quantity).await?;
    Ok(Json(ApiResponse::success(item)))
}

pub async fn set_quantity(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(item_id): Path<i64>,
    Json(req): Json<CartItemQuantity>,
) -> ServiceResult<Json<ApiResponse<()>>> {
    if req.quantity <= 0 {
        return Err(AppError::new(ErrorCode::InvalidQuantity).into());
    }
    let updated =
        db::carts::set_quantity(&state.pool, identity.user_id, item_id, req.quantity).await?;
    if !updated {
        return Err(AppError::new(ErrorCode::CartItemNotFound).into());
    }
    Ok(Json(ApiResponse::ok()))
}

pub async fn remove_item(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(item_id): Path<i64>,
) -> ServiceResult<Json<ApiResponse<()>>> {
    let removed = db::carts::remove_item(&state.pool, identity.user_id, item_id).await?;
    if !removed {
        return Err(AppError::new(ErrorCode::CartItemNotFound).into());
    }
    Ok(Json(ApiResponse::ok()))
}

pub async fn clear(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ServiceResult<Json<ApiResponse<()>>> {
    db::carts::clear(&state.pool, identity.user_id).await?;
    Ok(Json(ApiResponse::ok()))
}
