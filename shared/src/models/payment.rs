//! Payment and refund models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment gateway identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "text", rename_all = "snake_case"))]
pub enum Gateway {
    Toss,
    Stripe,
}

impl Gateway {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Toss => "toss",
            Self::Stripe => "stripe",
        }
    }
}

impl fmt::Display for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a single gateway transaction attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "text", rename_all = "snake_case"))]
pub enum PaymentStatus {
    Requested,
    Confirmed,
    Failed,
    Cancelled,
}

/// One row per gateway transaction attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    pub gateway: Gateway,
    /// Gateway-assigned payment identifier (Toss paymentKey / Stripe intent id)
    pub gateway_payment_id: String,
    pub status: PaymentStatus,
    pub amount: Decimal,
    /// Payment method reported by the gateway (card, transfer, ...)
    pub method: Option<String>,
    /// Raw gateway response for audit
    pub raw_response: Option<serde_json::Value>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Refund row, linked to a payment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Refund {
    pub id: i64,
    pub payment_id: i64,
    pub amount: Decimal,
    pub reason: Option<String>,
    pub created_at: i64,
}

/// Payments recorded against one order, with refunds summed across them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPayments {
    pub payments: Vec<Payment>,
    pub refunded_total: Decimal,
}

/// Payment confirmation request (storefront → server → gateway)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfirmRequest {
    pub order_id: i64,
    /// Toss paymentKey returned by the client-side widget
    pub payment_key: String,
    /// Amount the client believes it is paying; must match the stored total
    pub amount: Decimal,
}

/// Payment cancellation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCancelRequest {
    pub reason: Option<String>,
}
