//! Stripe webhook handler
//!
//! POST /api/stripe/webhook — handles Stripe events (raw body for signature
//! verification)

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use serde_json::json;

use hanmall_shared::events::EventKind;
use hanmall_shared::models::{Gateway, OrderStatus, PaymentStatus};

use crate::db;
use crate::gateway::stripe;
use crate::state::AppState;

/// Handle incoming Stripe webhook events
///
/// Must receive raw body (not JSON) for HMAC signature verification.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let sig_header = match headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
    {
        Some(s) => s,
        None => {
            tracing::warn!("Missing Stripe-Signature header");
            return StatusCode::BAD_REQUEST;
        }
    };

    if let Err(e) = stripe::verify_webhook_signature(&body, sig_header, &state.stripe_webhook_secret)
    {
        tracing::warn!(error = e, "Webhook signature verification failed");
        return StatusCode::BAD_REQUEST;
    }

    let event: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(%e, "Failed to parse webhook JSON");
            return StatusCode::BAD_REQUEST;
        }
    };

    let event_type = event["type"].as_str().unwrap_or("");
    let event_id = match event["id"].as_str() {
        Some(id) => id,
        None => {
            tracing::warn!("Webhook event missing id");
            return StatusCode::BAD_REQUEST;
        }
    };
    tracing::info!(event_type, event_id, "Received Stripe webhook");

    // Idempotency: INSERT first, check rows_affected (eliminates TOCTOU race)
    let first_delivery =
        match db::payments::record_webhook_event(&state.pool, event_id, event_type).await {
            Ok(recorded) => recorded,
            Err(e) => {
                tracing::error!(%e, "Failed to record webhook event");
                return StatusCode::INTERNAL_SERVER_ERROR;
            }
        };

    let result = match event_action(event_type, first_delivery) {
        None => {
            tracing::info!(event_id, "Duplicate webhook event, skipping");
            return StatusCode::OK;
        }
        Some(EventAction::Settle) => {
            settle_intent(&state, &event, PaymentStatus::Confirmed, OrderStatus::Paid).await
        }
        Some(EventAction::MarkFailed) => mark_intent_failed(&state, &event).await,
        Some(EventAction::RecordRefund) => record_charge_refund(&state, &event).await,
        Some(EventAction::Ignore) => {
            tracing::debug!(event_type, "Ignoring unhandled Stripe event type");
            Ok(())
        }
    };

    match result {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::error!(%e, event_type, "Webhook processing failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventAction {
    Settle,
    MarkFailed,
    RecordRefund,
    Ignore,
}

/// What a delivery does once its event id has been checked against the
/// processed set. A redelivered event id gets `None`: acknowledged with 200
/// so Stripe stops retrying, but nothing is touched.
fn event_action(event_type: &str, first_delivery: bool) -> Option<EventAction> {
    if !first_delivery {
        return None;
    }
    Some(match event_type {
        "payment_intent.succeeded" => EventAction::Settle,
        "payment_intent.payment_failed" | "payment_intent.canceled" => EventAction::MarkFailed,
        "charge.refunded" => EventAction::RecordRefund,
        _ => EventAction::Ignore,
    })
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn intent_from_event(event: &serde_json::Value) -> Result<&serde_json::Value, BoxError> {
    let intent = &event["data"]["object"];
    if intent["id"].as_str().is_none() {
        return Err("webhook event has no payment intent".into());
    }
    Ok(intent)
}

async fn settle_intent(
    state: &AppState,
    event: &serde_json::Value,
    payment_status: PaymentStatus,
    order_status: OrderStatus,
) -> Result<(), BoxError> {
    let intent = intent_from_event(event)?;
    let intent_id = intent["id"].as_str().unwrap_or_default();

    let Some(payment) =
        db::payments::find_by_gateway_id(&state.pool, Gateway::Stripe, intent_id).await?
    else {
        // An intent we did not create (e.g. from the Stripe dashboard)
        tracing::warn!(intent_id, "Webhook for unknown payment intent");
        return Ok(());
    };
    if payment.status == payment_status {
        // Stripe retried delivery under a fresh event id
        return Ok(());
    }

    db::payments::update_status(&state.pool, payment.id, payment_status, Some(intent)).await?;
    let updated = db::orders::update_status(&state.pool, payment.order_id, order_status)
        .await
        .map_err(|e| -> BoxError { format!("order transition: {e:?}").into() })?;

    state.events.publish(
        EventKind::OrderUpdate,
        json!({ "order_id": updated.id, "status": updated.status }),
    );
    tracing::info!(order_id = updated.id, intent_id, "stripe payment settled");
    Ok(())
}

/// A refund issued outside this server (Stripe dashboard, support tooling).
/// Refunds we initiate are recorded at cancel time and deduplicated here by
/// payment status.
async fn record_charge_refund(
    state: &AppState,
    event: &serde_json::Value,
) -> Result<(), BoxError> {
    let charge = &event["data"]["object"];
    let Some(intent_id) = charge["payment_intent"].as_str() else {
        tracing::warn!("charge.refunded event without payment_intent");
        return Ok(());
    };

    let Some(payment) =
        db::payments::find_by_gateway_id(&state.pool, Gateway::Stripe, intent_id).await?
    else {
        tracing::warn!(intent_id, "Refund webhook for unknown payment intent");
        return Ok(());
    };
    if payment.status == PaymentStatus::Cancelled {
        return Ok(());
    }

    // KRW is zero-decimal: amount_refunded is already whole won
    let refunded = charge["amount_refunded"].as_i64().unwrap_or(0);
    db::payments::update_status(&state.pool, payment.id, PaymentStatus::Cancelled, Some(charge))
        .await?;
    db::payments::insert_refund(
        &state.pool,
        payment.id,
        rust_decimal::Decimal::from(refunded),
        Some("Refunded via gateway"),
    )
    .await?;

    let order = db::orders::get_order(&state.pool, payment.order_id).await?;
    if let Some(order) = order {
        if order.status.can_transition(OrderStatus::Refunded) {
            let updated =
                db::orders::update_status(&state.pool, order.id, OrderStatus::Refunded)
                    .await
                    .map_err(|e| -> BoxError { format!("order transition: {e:?}").into() })?;
            state.events.publish(
                EventKind::OrderUpdate,
                json!({ "order_id": updated.id, "status": updated.status }),
            );
        }
    }
    tracing::info!(payment_id = payment.id, intent_id, "stripe refund recorded");
    Ok(())
}

async fn mark_intent_failed(state: &AppState, event: &serde_json::Value) -> Result<(), BoxError> {
    let intent = intent_from_event(event)?;
    let intent_id = intent["id"].as_str().unwrap_or_default();

    let Some(payment) =
        db::payments::find_by_gateway_id(&state.pool, Gateway::Stripe, intent_id).await?
    else {
        tracing::warn!(intent_id, "Webhook for unknown payment intent");
        return Ok(());
    };

    db::payments::update_status(&state.pool, payment.id, PaymentStatus::Failed, Some(intent))
        .await?;
    tracing::info!(payment_id = payment.id, intent_id, "stripe payment failed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_delivery_dispatches_by_type() {
        assert_eq!(
            event_action("payment_intent.succeeded", true),
            Some(EventAction::Settle)
        );
        assert_eq!(
            event_action("payment_intent.payment_failed", true),
            Some(EventAction::MarkFailed)
        );
        assert_eq!(
            event_action("charge.refunded", true),
            Some(EventAction::RecordRefund)
        );
        assert_eq!(
            event_action("customer.created", true),
            Some(EventAction::Ignore)
        );
    }

    #[test]
    fn redelivered_event_id_is_acknowledged_without_processing() {
        assert_eq!(event_action("payment_intent.succeeded", false), None);
        assert_eq!(event_action("charge.refunded", false), None);
    }
}
