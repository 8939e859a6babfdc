//! Order database operations
//!
//! Order creation runs stock decrement, header insert, and line-item insert
//! inside one transaction; a failure anywhere rolls the whole order back.
//! Status changes go through `OrderStatus::can_transition` — the single
//! authority for the order state machine.

use hanmall_shared::error::{AppError, ErrorCode};
use hanmall_shared::models::{Order, OrderCreate, OrderDetail, OrderItem, OrderStatus};
use hanmall_shared::util::{generate_order_number, now_millis};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::BoxError;
use crate::error::ServiceError;

const ORDER_COLUMNS: &str = "id, order_number, user_id, status, total_amount, \
     recipient_name, recipient_phone, shipping_address, memo, created_at, updated_at";

pub async fn get_order(pool: &PgPool, id: i64) -> Result<Option<Order>, BoxError> {
    let row: Option<Order> =
        sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

pub async fn get_order_detail(pool: &PgPool, id: i64) -> Result<Option<OrderDetail>, BoxError> {
    let Some(order) = get_order(pool, id).await? else {
        return Ok(None);
    };
    let items: Vec<OrderItem> = sqlx::query_as(
        "SELECT id, order_id, product_id, product_name, unit_price, quantity
         FROM order_items WHERE order_id = $1 ORDER BY id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;
    Ok(Some(OrderDetail { order, items }))
}

pub async fn list_orders(
    pool: &PgPool,
    user_id: Option<i64>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Order>, BoxError> {
    let rows: Vec<Order> = sqlx::query_as(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders
         WHERE ($1::bigint IS NULL OR user_id = $1)
         ORDER BY created_at DESC
         LIMIT $2 OFFSET $3"
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Create an order: validate products, decrement stock, insert header and
/// line items — all in one transaction.
pub async fn create_order(
    pool: &PgPool,
    user_id: i64,
    data: &OrderCreate,
) -> Result<OrderDetail, ServiceError> {
    if data.items.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyOrder).into());
    }
    for item in &data.items {
        if item.quantity <= 0 {
            return Err(AppError::new(ErrorCode::InvalidQuantity)
                .with_detail("product_id", item.product_id)
                .into());
        }
    }

    let now = now_millis();
    let mut tx = pool.begin().await?;

    let mut total = Decimal::ZERO;
    let mut lines: Vec<(i64, String, Decimal, i32)> = Vec::with_capacity(data.items.len());

    for item in &data.items {
        // Row lock so concurrent orders cannot oversell
        let row: Option<(String, Decimal, i32, bool)> = sqlx::query_as(
            "SELECT name, price, stock, is_active FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(item.product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((name, price, stock, is_active)) = row else {
            return Err(AppError::new(ErrorCode::ProductNotFound)
                .with_detail("product_id", item.product_id)
                .into());
        };
        if !is_active {
            return Err(AppError::new(ErrorCode::ProductInactive)
                .with_detail("product_id", item.product_id)
                .into());
        }
        if stock < item.quantity {
            return Err(AppError::new(ErrorCode::InsufficientStock)
                .with_detail("product_id", item.product_id)
                .with_detail("available", stock)
                .into());
        }

        sqlx::query("UPDATE products SET stock = stock - $1, updated_at = $2 WHERE id = $3")
            .bind(item.quantity)
            .bind(now)
            .bind(item.product_id)
            .execute(&mut *tx)
            .await?;

        total += price * Decimal::from(item.quantity);
        lines.push((item.product_id, name, price, item.quantity));
    }

    let order: Order = sqlx::query_as(&format!(
        "INSERT INTO orders (
            order_number, user_id, status, total_amount,
            recipient_name, recipient_phone, shipping_address, memo,
            created_at, updated_at
        )
        VALUES ($1, $2, 'pending', $3, $4, $5, $6, $7, $8, $8)
        RETURNING {ORDER_COLUMNS}"
    ))
    .bind(generate_order_number())
    .bind(user_id)
    .bind(total)
    .bind(&data.recipient_name)
    .bind(&data.recipient_phone)
    .bind(&data.shipping_address)
    .bind(&data.memo)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let mut items = Vec::with_capacity(lines.len());
    for (product_id, product_name, unit_price, quantity) in lines {
        let item: OrderItem = sqlx::query_as(
            "INSERT INTO order_items (order_id, product_id, product_name, unit_price, quantity)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, order_id, product_id, product_name, unit_price, quantity",
        )
        .bind(order.id)
        .bind(product_id)
        .bind(&product_name)
        .bind(unit_price)
        .bind(quantity)
        .fetch_one(&mut *tx)
        .await?;
        items.push(item);
    }

    tx.commit().await?;
    Ok(OrderDetail { order, items })
}

/// Transition an order to `next`, enforcing the state machine.
pub async fn update_status(
    pool: &PgPool,
    id: i64,
    next: OrderStatus,
) -> Result<Order, ServiceError> {
    let now = now_millis();
    let mut tx = pool.begin().await?;

    let current: Option<OrderStatus> =
        sqlx::query_scalar("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

    let Some(current) = current else {
        return Err(AppError::new(ErrorCode::OrderNotFound).into());
    };

    if !current.can_transition(next) {
        return Err(AppError::new(ErrorCode::InvalidStatusTransition)
            .with_detail("from", current.as_str())
            .with_detail("to", next.as_str())
            .into());
    }

    let order: Order = sqlx::query_as(&format!(
        "UPDATE orders SET status = $1, updated_at = $2 WHERE id = $3 RETURNING {ORDER_COLUMNS}"
    ))
    .bind(next)
    .bind(now)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(order)
}
