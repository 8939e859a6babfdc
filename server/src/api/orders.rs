//! Storefront order endpoints
//!
//! Checkout creates the order (stock is reserved here); payment confirmation
//! happens afterwards through the payments routes.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;

use hanmall_shared::error::{ApiResponse, AppError, ErrorCode};
use hanmall_shared::events::EventKind;
use hanmall_shared::models::{Order, OrderCreate, OrderDetail};

use crate::auth::Identity;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<OrderCreate>,
) -> ServiceResult<Json<ApiResponse<OrderDetail>>> {
    let detail = db::orders::create_order(&state.pool, identity.user_id, &req).await?;

    state.events.publish(
        EventKind::OrderUpdate,
        json!({ "order_id": detail.order.id, "status": detail.order.status }),
    );
    // Checkout consumed stock from the items now on the order
    for item in &detail.items {
        state.events.publish(
            EventKind::InventoryUpdate,
            json!({ "product_id": item.product_id }),
        );
    }
    tracing::info!(
        order_id = detail.order.id,
        order_number = %detail.order.order_number,
        "order created"
    );

    Ok(Json(ApiResponse::success(detail)))
}

pub async fn list_mine(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<ListOrdersQuery>,
) -> ServiceResult<Json<ApiResponse<Vec<Order>>>> {
    let orders = db::orders::list_orders(
        &state.pool,
        Some(identity.user_id),
        query.limit.unwrap_or(20).clamp(1, 100),
        query.offset.unwrap_or(0).max(0),
    )
    .await?;
    Ok(Json(ApiResponse::success(orders)))
}

pub async fn get_mine(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<ApiResponse<OrderDetail>>> {
    let detail = db::orders::get_order_detail(&state.pool, id)
        .await?
        .filter(|d| d.order.user_id == identity.user_id || identity.is_admin())
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    Ok(Json(ApiResponse::success(detail)))
}
