//! Toss Payments integration via REST API
//!
//! The browser widget collects card details and hands us a `paymentKey`;
//! the server confirms the charge (server-side amount check happens before
//! this call) and can cancel a confirmed payment.

use serde_json::{Value, json};

use super::BoxError;

const BASE_URL: &str = "https://api.tosspayments.com/v1/payments";

/// Confirm a payment the widget prepared. `order_id` is our order number,
/// not the numeric primary key.
pub async fn confirm_payment(
    secret_key: &str,
    payment_key: &str,
    order_id: &str,
    amount: i64,
) -> Result<Value, BoxError> {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{BASE_URL}/confirm"))
        .basic_auth(secret_key, None::<&str>)
        .json(&json!({
            "paymentKey": payment_key,
            "orderId": order_id,
            "amount": amount,
        }))
        .send()
        .await?;

    let status = resp.status();
    let body: Value = resp.json().await?;
    if !status.is_success() {
        return Err(format!("Toss confirm failed ({status}): {body}").into());
    }
    Ok(body)
}

/// Cancel (full refund) or partially cancel a confirmed payment.
pub async fn cancel_payment(
    secret_key: &str,
    payment_key: &str,
    reason: &str,
    amount: Option<i64>,
) -> Result<Value, BoxError> {
    let mut payload = json!({ "cancelReason": reason });
    if let Some(amount) = amount {
        payload["cancelAmount"] = json!(amount);
    }

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{BASE_URL}/{payment_key}/cancel"))
        .basic_auth(secret_key, None::<&str>)
        .json(&payload)
        .send()
        .await?;

    let status = resp.status();
    let body: Value = resp.json().await?;
    if !status.is_success() {
        return Err(format!("Toss cancel failed ({status}): {body}").into());
    }
    Ok(body)
}
