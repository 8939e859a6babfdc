//! Stripe integration via REST API (no SDK dependency)
//!
//! Used for overseas cards. KRW is a zero-decimal currency on Stripe, so
//! amounts go over the wire as whole won.

use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;

use super::BoxError;

const BASE_URL: &str = "https://api.stripe.com/v1";

/// Create a PaymentIntent for an order. Returns the raw intent JSON; the
/// client secret inside it goes to the browser.
pub async fn create_payment_intent(
    secret_key: &str,
    amount: i64,
    order_number: &str,
) -> Result<Value, BoxError> {
    let amount = amount.to_string();
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{BASE_URL}/payment_intents"))
        .basic_auth(secret_key, None::<&str>)
        .form(&[
            ("amount", amount.as_str()),
            ("currency", "krw"),
            ("automatic_payment_methods[enabled]", "true"),
            ("metadata[order_number]", order_number),
        ])
        .send()
        .await?;

    let status = resp.status();
    let body: Value = resp.json().await?;
    if !status.is_success() {
        return Err(format!("Stripe create intent failed ({status}): {body}").into());
    }
    Ok(body)
}

pub async fn retrieve_payment_intent(
    secret_key: &str,
    intent_id: &str,
) -> Result<Value, BoxError> {
    let client = reqwest::Client::new();
    let resp = client
        .get(format!("{BASE_URL}/payment_intents/{intent_id}"))
        .basic_auth(secret_key, None::<&str>)
        .send()
        .await?;

    let status = resp.status();
    let body: Value = resp.json().await?;
    if !status.is_success() {
        return Err(format!("Stripe retrieve intent failed ({status}): {body}").into());
    }
    Ok(body)
}

/// Refund a captured PaymentIntent, fully or partially.
pub async fn create_refund(
    secret_key: &str,
    intent_id: &str,
    amount: Option<i64>,
) -> Result<Value, BoxError> {
    let mut form = vec![("payment_intent".to_string(), intent_id.to_string())];
    if let Some(amount) = amount {
        form.push(("amount".to_string(), amount.to_string()));
    }

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{BASE_URL}/refunds"))
        .basic_auth(secret_key, None::<&str>)
        .form(&form)
        .send()
        .await?;

    let status = resp.status();
    let body: Value = resp.json().await?;
    if !status.is_success() {
        return Err(format!("Stripe refund failed ({status}): {body}").into());
    }
    Ok(body)
}

/// Verify Stripe webhook signature (HMAC-SHA256)
pub fn verify_webhook_signature(
    payload: &[u8],
    sig_header: &str,
    secret: &str,
) -> Result<(), &'static str> {
    let mut timestamp = "";
    let mut signature = "";
    for part in sig_header.split(',') {
        if let Some(t) = part.strip_prefix("t=") {
            timestamp = t;
        } else if let Some(v) = part.strip_prefix("v1=") {
            signature = v;
        }
    }

    if timestamp.is_empty() || signature.is_empty() {
        return Err("Invalid Stripe-Signature header");
    }

    let signed_payload = format!("{timestamp}.{}", std::str::from_utf8(payload).unwrap_or(""));
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|_| "HMAC key error")?;
    mac.update(signed_payload.as_bytes());

    // Decode hex signature and use constant-time comparison via hmac::verify_slice
    let sig_bytes = hex::decode(signature).map_err(|_| "Invalid signature hex")?;
    mac.verify_slice(&sig_bytes)
        .map_err(|_| "Webhook signature mismatch")?;

    // Reject events older than 5 minutes to prevent replay attacks
    let ts: i64 = timestamp.parse().map_err(|_| "Invalid timestamp")?;
    let now = chrono::Utc::now().timestamp();
    if (now - ts).abs() > 300 {
        return Err("Webhook timestamp too old");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(payload: &[u8], secret: &str, ts: i64) -> String {
        let signed = format!("{ts}.{}", std::str::from_utf8(payload).unwrap());
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(signed.as_bytes());
        let sig = hex::encode(mac.finalize().into_bytes());
        format!("t={ts},v1={sig}")
    }

    #[test]
    fn accepts_valid_signature() {
        let payload = br#"{"id":"evt_1","type":"payment_intent.succeeded"}"#;
        let header = sign(payload, "whsec_test", chrono::Utc::now().timestamp());
        assert!(verify_webhook_signature(payload, &header, "whsec_test").is_ok());
    }

    #[test]
    fn rejects_wrong_secret() {
        let payload = b"{}";
        let header = sign(payload, "whsec_test", chrono::Utc::now().timestamp());
        assert!(verify_webhook_signature(payload, &header, "whsec_other").is_err());
    }

    #[test]
    fn rejects_stale_timestamp() {
        let payload = b"{}";
        let header = sign(payload, "whsec_test", chrono::Utc::now().timestamp() - 600);
        assert!(verify_webhook_signature(payload, &header, "whsec_test").is_err());
    }

    #[test]
    fn rejects_malformed_header() {
        assert!(verify_webhook_signature(b"{}", "nonsense", "whsec_test").is_err());
    }
}
