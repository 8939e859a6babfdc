//! Order model and status state machine
//!
//! Status transitions are validated in exactly one place
//! ([`OrderStatus::can_transition`]); handlers never decide on their own
//! which statuses are valid to transition from.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "text", rename_all = "snake_case"))]
pub enum OrderStatus {
    /// Created, awaiting payment
    Pending,
    /// Payment confirmed
    Paid,
    /// Being prepared for shipment
    Preparing,
    /// Handed to the carrier
    Shipped,
    /// Received by the customer
    Delivered,
    /// Cancelled before fulfilment
    Cancelled,
    /// Refunded after payment
    Refunded,
}

impl OrderStatus {
    /// String form used in the database and API
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Preparing => "preparing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }

    /// Parse from the database/API string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "preparing" => Some(Self::Preparing),
            "shipped" => Some(Self::Shipped),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }

    /// Whether a transition from `self` to `next` is allowed
    pub fn can_transition(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Paid)
                | (Pending, Cancelled)
                | (Paid, Preparing)
                | (Paid, Cancelled)
                | (Paid, Refunded)
                | (Preparing, Shipped)
                | (Preparing, Refunded)
                | (Shipped, Delivered)
                | (Delivered, Refunded)
        )
    }

    /// Terminal statuses allow no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Refunded)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order header
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// Human-facing order number, e.g. `ORD-20260830-4F2K9Q`
    pub order_number: String,
    pub user_id: i64,
    pub status: OrderStatus,
    /// Grand total in KRW
    pub total_amount: Decimal,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub shipping_address: String,
    pub memo: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    /// Product name captured at order time
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

/// Order with its line items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub items: Vec<OrderItemCreate>,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub shipping_address: String,
    pub memo: Option<String>,
}

/// Line item in a create-order payload; prices are recomputed server-side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemCreate {
    pub product_id: i64,
    pub quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for s in [
            OrderStatus::Pending,
            OrderStatus::Paid,
            OrderStatus::Preparing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::Refunded,
        ] {
            assert_eq!(OrderStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(OrderStatus::parse("unknown"), None);
    }

    #[test]
    fn test_happy_path_transitions() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Paid));
        assert!(OrderStatus::Paid.can_transition(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition(OrderStatus::Delivered));
        assert!(OrderStatus::Delivered.can_transition(OrderStatus::Refunded));
    }

    #[test]
    fn test_cancellation_and_refund() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Cancelled));
        assert!(OrderStatus::Paid.can_transition(OrderStatus::Cancelled));
        assert!(OrderStatus::Paid.can_transition(OrderStatus::Refunded));
        assert!(OrderStatus::Preparing.can_transition(OrderStatus::Refunded));
        assert!(!OrderStatus::Shipped.can_transition(OrderStatus::Cancelled));
    }

    #[test]
    fn test_invalid_transitions_rejected() {
        assert!(!OrderStatus::Pending.can_transition(OrderStatus::Shipped));
        assert!(!OrderStatus::Pending.can_transition(OrderStatus::Delivered));
        assert!(!OrderStatus::Delivered.can_transition(OrderStatus::Paid));
        assert!(!OrderStatus::Paid.can_transition(OrderStatus::Paid));
    }

    #[test]
    fn test_terminal_statuses() {
        for next in [
            OrderStatus::Pending,
            OrderStatus::Paid,
            OrderStatus::Preparing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::Refunded,
        ] {
            assert!(!OrderStatus::Cancelled.can_transition(next));
            assert!(!OrderStatus::Refunded.can_transition(next));
        }
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Refunded.is_terminal());
        assert!(!OrderStatus::Paid.is_terminal());
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&OrderStatus::Preparing).unwrap();
        assert_eq!(json, "\"preparing\"");
        let status: OrderStatus = serde_json::from_str("\"refunded\"").unwrap();
        assert_eq!(status, OrderStatus::Refunded);
    }
}
