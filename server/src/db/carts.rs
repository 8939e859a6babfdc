//! Cart database operations

use hanmall_shared::models::{CartItem, CartItemView};
use hanmall_shared::util::now_millis;
use sqlx::PgPool;

use super::BoxError;

pub async fn list_items(pool: &PgPool, user_id: i64) -> Result<Vec<CartItemView>, BoxError> {
    let rows: Vec<CartItemView> = sqlx::query_as(
        r#"
        SELECT ci.id, ci.product_id, p.name AS product_name, p.price,
               p.image, p.stock, ci.quantity
        FROM cart_items ci
        JOIN products p ON p.id = ci.product_id
        WHERE ci.user_id = $1
        ORDER BY ci.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Add to cart; adding an already-carted product increments its quantity.
pub async fn add_item(
    pool: &PgPool,
    user_id: i64,
    product_id: i64,
    quantity: i32,
) -> Result<CartItem, BoxError> {
    let row: CartItem = sqlx::query_as(
        r#"
        INSERT INTO cart_items (user_id, product_id, quantity, created_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, product_id)
        DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
        RETURNING id, user_id, product_id, quantity, created_at
        "#,
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn set_quantity(
    pool: &PgPool,
    user_id: i64,
    item_id: i64,
    quantity: i32,
) -> Result<bool, BoxError> {
    let result = sqlx::query(
        "UPDATE cart_items SET quantity = $1 WHERE id = $2 AND user_id = $3",
    )
    .bind(quantity)
    .bind(item_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn remove_item(pool: &PgPool, user_id: i64, item_id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
        .bind(item_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn clear(pool: &PgPool, user_id: i64) -> Result<u64, BoxError> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
