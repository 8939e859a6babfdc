//! Cart model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cart line, one row per (user, product)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub created_at: i64,
}

/// Cart line joined with live product data for display
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartItemView {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub stock: i32,
    pub quantity: i32,
}

/// Add-to-cart payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemAdd {
    pub product_id: i64,
    pub quantity: i32,
}

/// Change-quantity payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemQuantity {
    pub quantity: i32,
}
