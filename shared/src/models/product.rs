//! Product model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    /// Unit price in KRW
    pub price: Decimal,
    /// Strike-through price for promotions (display only)
    pub original_price: Option<Decimal>,
    pub image: Option<String>,
    pub stock: i32,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Product list row with joined category name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductListItem {
    pub id: i64,
    pub name: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub image: Option<String>,
    pub stock: i32,
    pub is_active: bool,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub image: Option<String>,
    #[serde(default)]
    pub stock: i32,
    pub sort_order: Option<i32>,
}

/// Update product payload (partial; `None` fields are left unchanged)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub image: Option<String>,
    pub stock: Option<i32>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}
