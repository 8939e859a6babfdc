//! Admin order management
//!
//! Status changes always go through the shared transition table; a payment
//! cancellation refunds through the original gateway before the order moves.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::json;

use hanmall_shared::error::{ApiResponse, AppError, ErrorCode};
use hanmall_shared::events::EventKind;
use hanmall_shared::models::{
    Gateway, Order, OrderDetail, OrderPayments, OrderStatus, Payment, PaymentCancelRequest,
    PaymentStatus,
};

use crate::db;
use crate::error::{ServiceError, ServiceResult};
use crate::gateway::{self, stripe, toss};
use crate::state::AppState;

use rust_decimal::prelude::ToPrimitive;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ServiceResult<Json<ApiResponse<Vec<Order>>>> {
    let orders = db::orders::list_orders(
        &state.pool,
        None,
        query.limit.unwrap_or(50).clamp(1, 200),
        query.offset.unwrap_or(0).max(0),
    )
    .await?;
    Ok(Json(ApiResponse::success(orders)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<ApiResponse<OrderDetail>>> {
    let detail = db::orders::get_order_detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    Ok(Json(ApiResponse::success(detail)))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<StatusRequest>,
) -> ServiceResult<Json<ApiResponse<Order>>> {
    let next = OrderStatus::parse(&req.status)
        .ok_or_else(|| AppError::validation(format!("Unknown order status: {}", req.status)))?;

    let order = db::orders::update_status(&state.pool, id, next).await?;

    state.events.publish(
        EventKind::OrderUpdate,
        json!({ "order_id": order.id, "status": order.status }),
    );
    tracing::info!(order_id = order.id, status = %order.status, "order status updated");
    Ok(Json(ApiResponse::success(order)))
}

pub async fn list_payments(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> ServiceResult<Json<ApiResponse<OrderPayments>>> {
    let payments = db::payments::list_for_order(&state.pool, order_id).await?;
    let mut refunded_total = rust_decimal::Decimal::ZERO;
    for payment in &payments {
        refunded_total += db::payments::refund_total(&state.pool, payment.id).await?;
    }
    Ok(Json(ApiResponse::success(OrderPayments {
        payments,
        refunded_total,
    })))
}

/// Where a refunded order lands, checked against the transition table.
///
/// A paid-but-unshipped order is cancelled; anything further along is a
/// refund. An order whose status has no refund arc (e.g. `shipped`) is
/// rejected here, before any money moves at the gateway.
fn refund_transition(current: OrderStatus) -> Result<OrderStatus, AppError> {
    let next = if current == OrderStatus::Paid {
        OrderStatus::Cancelled
    } else {
        OrderStatus::Refunded
    };
    if !current.can_transition(next) {
        return Err(AppError::new(ErrorCode::CancellationFailed)
            .with_detail("order_status", current.as_str()));
    }
    Ok(next)
}

/// Refund a confirmed payment through its gateway, record the refund, and
/// move the order to `refunded` (or `cancelled` when it never shipped).
pub async fn cancel_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<i64>,
    Json(req): Json<PaymentCancelRequest>,
) -> ServiceResult<Json<ApiResponse<Payment>>> {
    let payment = db::payments::get_payment(&state.pool, payment_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound))?;
    if payment.status != PaymentStatus::Confirmed {
        return Err(AppError::new(ErrorCode::CancellationFailed)
            .with_detail("status", format!("{:?}", payment.status).to_lowercase())
            .into());
    }

    let order = db::orders::get_order(&state.pool, payment.order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    let next = refund_transition(order.status)?;
    let reason = req.reason.as_deref().unwrap_or("Admin cancellation");

    let won = payment
        .amount
        .to_i64()
        .ok_or_else(|| ServiceError::App(AppError::validation("Amount out of range")))?;

    let raw = match payment.gateway {
        Gateway::Toss => {
            toss::cancel_payment(&state.toss_secret_key, &payment.gateway_payment_id, reason, None)
                .await
                .map_err(|e| ServiceError::App(gateway::gateway_error("toss", &e)))?
        }
        Gateway::Stripe => {
            stripe::create_refund(
                &state.stripe_secret_key,
                &payment.gateway_payment_id,
                Some(won),
            )
            .await
            .map_err(|e| ServiceError::App(gateway::gateway_error("stripe", &e)))?
        }
    };

    db::payments::update_status(&state.pool, payment.id, PaymentStatus::Cancelled, Some(&raw))
        .await?;
    db::payments::insert_refund(&state.pool, payment.id, payment.amount, Some(reason)).await?;

    let order = db::orders::update_status(&state.pool, order.id, next).await?;

    state.events.publish(
        EventKind::OrderUpdate,
        json!({ "order_id": order.id, "status": order.status }),
    );
    tracing::info!(payment_id, order_id = order.id, "payment cancelled and refunded");

    let payment = db::payments::get_payment(&state.pool, payment_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound))?;
    Ok(Json(ApiResponse::success(payment)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paid_order_cancels() {
        assert_eq!(
            refund_transition(OrderStatus::Paid).unwrap(),
            OrderStatus::Cancelled
        );
    }

    #[test]
    fn preparing_and_delivered_orders_refund() {
        assert_eq!(
            refund_transition(OrderStatus::Preparing).unwrap(),
            OrderStatus::Refunded
        );
        assert_eq!(
            refund_transition(OrderStatus::Delivered).unwrap(),
            OrderStatus::Refunded
        );
    }

    #[test]
    fn shipped_order_is_rejected_before_refunding() {
        let err = refund_transition(OrderStatus::Shipped).unwrap_err();
        assert_eq!(err.code, ErrorCode::CancellationFailed);
    }

    #[test]
    fn unpaid_and_terminal_orders_are_rejected() {
        assert!(refund_transition(OrderStatus::Cancelled).is_err());
        assert!(refund_transition(OrderStatus::Refunded).is_err());
        assert!(refund_transition(OrderStatus::Pending).is_err());
    }
}
