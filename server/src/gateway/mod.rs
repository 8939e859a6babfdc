//! Payment gateway adapters (REST, no SDK dependency)
//!
//! Both gateways are driven through their plain HTTP APIs: Toss Payments for
//! the domestic card/transfer flow and Stripe PaymentIntents for overseas
//! cards. Responses are kept as raw JSON and stored verbatim on the payment
//! row for dispute handling.

pub mod stripe;
pub mod toss;

use hanmall_shared::error::AppError;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Map a gateway transport/API failure to the client-facing error.
pub fn gateway_error(gateway: &str, err: &dyn std::fmt::Display) -> AppError {
    tracing::error!(%gateway, error = %err, "payment gateway call failed");
    AppError::gateway(format!("{gateway} gateway error"))
}
