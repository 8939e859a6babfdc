//! Storefront payment endpoints
//!
//! POST /api/payments/confirm       — confirm a Toss widget payment
//! POST /api/payments/stripe/intent — create a Stripe PaymentIntent
//!
//! The stored order total is the only trusted amount. The client-reported
//! amount is checked against it before any gateway call is made.

use axum::extract::State;
use axum::{Extension, Json};
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde_json::json;

use hanmall_shared::error::{ApiResponse, AppError, ErrorCode};
use hanmall_shared::events::EventKind;
use hanmall_shared::models::{
    Gateway, Order, OrderStatus, Payment, PaymentConfirmRequest, PaymentStatus,
};

use crate::auth::Identity;
use crate::db;
use crate::error::{ServiceError, ServiceResult};
use crate::gateway::{self, stripe, toss};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct StripeIntentRequest {
    pub order_id: i64,
}

/// Load an order for payment: must exist, belong to the caller, and still be
/// awaiting payment.
async fn payable_order(
    state: &AppState,
    identity: &Identity,
    order_id: i64,
) -> ServiceResult<Order> {
    let order = db::orders::get_order(&state.pool, order_id)
        .await?
        .filter(|o| o.user_id == identity.user_id || identity.is_admin())
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    if order.status != OrderStatus::Pending {
        return Err(AppError::new(ErrorCode::PaymentAlreadyConfirmed)
            .with_detail("status", order.status.as_str())
            .into());
    }
    Ok(order)
}

fn amount_as_won(amount: rust_decimal::Decimal) -> ServiceResult<i64> {
    amount
        .to_i64()
        .ok_or_else(|| ServiceError::App(AppError::validation("Amount out of range")))
}

/// The stored order total is the only trusted amount; a client-reported
/// amount that differs fails here, before the gateway sees anything.
fn ensure_amount_matches(
    expected: rust_decimal::Decimal,
    received: rust_decimal::Decimal,
) -> Result<(), AppError> {
    if received != expected {
        return Err(AppError::new(ErrorCode::OrderAmountMismatch)
            .with_detail("expected", expected.to_string())
            .with_detail("received", received.to_string()));
    }
    Ok(())
}

pub async fn toss_confirm(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<PaymentConfirmRequest>,
) -> ServiceResult<Json<ApiResponse<Payment>>> {
    let order = payable_order(&state, &identity, req.order_id).await?;

    ensure_amount_matches(order.total_amount, req.amount)?;

    let won = amount_as_won(order.total_amount)?;
    let raw = toss::confirm_payment(
        &state.toss_secret_key,
        &req.payment_key,
        &order.order_number,
        won,
    )
    .await
    .map_err(|e| ServiceError::App(gateway::gateway_error("toss", &e)))?;

    let method = raw["method"].as_str().map(str::to_owned);
    let payment = db::payments::insert_payment(
        &state.pool,
        order.id,
        Gateway::Toss,
        &req.payment_key,
        PaymentStatus::Confirmed,
        order.total_amount,
        method.as_deref(),
        Some(&raw),
    )
    .await?;

    let updated = db::orders::update_status(&state.pool, order.id, OrderStatus::Paid).await?;
    db::carts::clear(&state.pool, identity.user_id).await?;

    state.events.publish(
        EventKind::OrderUpdate,
        json!({ "order_id": updated.id, "status": updated.status }),
    );
    tracing::info!(order_id = order.id, payment_id = payment.id, "toss payment confirmed");

    Ok(Json(ApiResponse::success(payment)))
}

pub async fn stripe_intent(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<StripeIntentRequest>,
) -> ServiceResult<Json<ApiResponse<serde_json::Value>>> {
    let order = payable_order(&state, &identity, req.order_id).await?;
    let won = amount_as_won(order.total_amount)?;

    // A retried checkout reuses the intent Stripe already holds for the order
    let pending = db::payments::list_for_order(&state.pool, order.id)
        .await?
        .into_iter()
        .find(|p| p.gateway == Gateway::Stripe && p.status == PaymentStatus::Requested);
    if let Some(pending) = pending {
        let intent =
            stripe::retrieve_payment_intent(&state.stripe_secret_key, &pending.gateway_payment_id)
                .await
                .map_err(|e| ServiceError::App(gateway::gateway_error("stripe", &e)))?;
        if intent["status"].as_str().is_some_and(|s| s.starts_with("requires_")) {
            return Ok(Json(ApiResponse::success(json!({
                "payment_intent_id": pending.gateway_payment_id,
                "client_secret": intent["client_secret"],
            }))));
        }
    }

    let intent = stripe::create_payment_intent(&state.stripe_secret_key, won, &order.order_number)
        .await
        .map_err(|e| ServiceError::App(gateway::gateway_error("stripe", &e)))?;

    let intent_id = intent["id"]
        .as_str()
        .ok_or_else(|| ServiceError::App(gateway::gateway_error("stripe", &"intent missing id")))?;

    db::payments::insert_payment(
        &state.pool,
        order.id,
        Gateway::Stripe,
        intent_id,
        PaymentStatus::Requested,
        order.total_amount,
        None,
        Some(&intent),
    )
    .await?;

    // Only the client secret leaves the server
    Ok(Json(ApiResponse::success(json!({
        "payment_intent_id": intent_id,
        "client_secret": intent["client_secret"],
    }))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn matching_amount_passes() {
        assert!(ensure_amount_matches(Decimal::from(45000), Decimal::from(45000)).is_ok());
    }

    #[test]
    fn mismatched_amount_is_rejected_with_both_values() {
        let err =
            ensure_amount_matches(Decimal::from(45000), Decimal::from(1000)).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderAmountMismatch);
        let details = err.details.unwrap();
        assert_eq!(details.get("expected").unwrap(), "45000");
        assert_eq!(details.get("received").unwrap(), "1000");
    }
}
