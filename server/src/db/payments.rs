//! Payment and refund database operations

use hanmall_shared::models::{Gateway, Payment, PaymentStatus, Refund};
use hanmall_shared::util::now_millis;
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::BoxError;

const PAYMENT_COLUMNS: &str = "id, order_id, gateway, gateway_payment_id, status, \
     amount, method, raw_response, created_at, updated_at";

pub async fn insert_payment(
    pool: &PgPool,
    order_id: i64,
    gateway: Gateway,
    gateway_payment_id: &str,
    status: PaymentStatus,
    amount: Decimal,
    method: Option<&str>,
    raw_response: Option<&serde_json::Value>,
) -> Result<Payment, BoxError> {
    let now = now_millis();
    let row: Payment = sqlx::query_as(&format!(
        "INSERT INTO payments (
            order_id, gateway, gateway_payment_id, status, amount,
            method, raw_response, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        RETURNING {PAYMENT_COLUMNS}"
    ))
    .bind(order_id)
    .bind(gateway)
    .bind(gateway_payment_id)
    .bind(status)
    .bind(amount)
    .bind(method)
    .bind(raw_response)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn get_payment(pool: &PgPool, id: i64) -> Result<Option<Payment>, BoxError> {
    let row: Option<Payment> = sqlx::query_as(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_gateway_id(
    pool: &PgPool,
    gateway: Gateway,
    gateway_payment_id: &str,
) -> Result<Option<Payment>, BoxError> {
    let row: Option<Payment> = sqlx::query_as(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments WHERE gateway = $1 AND gateway_payment_id = $2"
    ))
    .bind(gateway)
    .bind(gateway_payment_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn list_for_order(pool: &PgPool, order_id: i64) -> Result<Vec<Payment>, BoxError> {
    let rows: Vec<Payment> = sqlx::query_as(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments WHERE order_id = $1 ORDER BY created_at"
    ))
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn update_status(
    pool: &PgPool,
    id: i64,
    status: PaymentStatus,
    raw_response: Option<&serde_json::Value>,
) -> Result<(), BoxError> {
    sqlx::query(
        "UPDATE payments SET status = $1, raw_response = COALESCE($2, raw_response), updated_at = $3
         WHERE id = $4",
    )
    .bind(status)
    .bind(raw_response)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_refund(
    pool: &PgPool,
    payment_id: i64,
    amount: Decimal,
    reason: Option<&str>,
) -> Result<Refund, BoxError> {
    let row: Refund = sqlx::query_as(
        "INSERT INTO refunds (payment_id, amount, reason, created_at)
         VALUES ($1, $2, $3, $4)
         RETURNING id, payment_id, amount, reason, created_at",
    )
    .bind(payment_id)
    .bind(amount)
    .bind(reason)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Sum of refunds recorded against a payment
pub async fn refund_total(pool: &PgPool, payment_id: i64) -> Result<Decimal, BoxError> {
    let total: Option<Decimal> =
        sqlx::query_scalar("SELECT SUM(amount) FROM refunds WHERE payment_id = $1")
            .bind(payment_id)
            .fetch_one(pool)
            .await?;
    Ok(total.unwrap_or(Decimal::ZERO))
}

/// Record a webhook event id; returns false when it was already processed.
pub async fn record_webhook_event(
    pool: &PgPool,
    event_id: &str,
    event_type: &str,
) -> Result<bool, BoxError> {
    let result = sqlx::query(
        "INSERT INTO processed_webhook_events (event_id, event_type, processed_at)
         VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
    )
    .bind(event_id)
    .bind(event_type)
    .bind(now_millis())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
