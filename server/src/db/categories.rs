//! Category database operations

use hanmall_shared::models::{Category, CategoryCreate, CategoryUpdate};
use sqlx::PgPool;

use super::BoxError;

pub async fn list_categories(pool: &PgPool, only_active: bool) -> Result<Vec<Category>, BoxError> {
    let rows: Vec<Category> = sqlx::query_as(
        r#"
        SELECT id, name, slug, sort_order, is_active
        FROM categories
        WHERE is_active OR NOT $1
        ORDER BY sort_order, id
        "#,
    )
    .bind(only_active)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create_category(pool: &PgPool, data: &CategoryCreate) -> Result<Category, BoxError> {
    let row: Category = sqlx::query_as(
        r#"
        INSERT INTO categories (name, slug, sort_order, is_active)
        VALUES ($1, $2, $3, TRUE)
        RETURNING id, name, slug, sort_order, is_active
        "#,
    )
    .bind(&data.name)
    .bind(&data.slug)
    .bind(data.sort_order.unwrap_or(0))
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update_category(
    pool: &PgPool,
    id: i64,
    data: &CategoryUpdate,
) -> Result<Option<Category>, BoxError> {
    let row: Option<Category> = sqlx::query_as(
        r#"
        UPDATE categories SET
            name = COALESCE($1, name),
            slug = COALESCE($2, slug),
            sort_order = COALESCE($3, sort_order),
            is_active = COALESCE($4, is_active)
        WHERE id = $5
        RETURNING id, name, slug, sort_order, is_active
        "#,
    )
    .bind(&data.name)
    .bind(&data.slug)
    .bind(data.sort_order)
    .bind(data.is_active)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete_category(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
