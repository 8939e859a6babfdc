//! Product database operations

use hanmall_shared::models::{Product, ProductCreate, ProductListItem, ProductUpdate};
use hanmall_shared::util::now_millis;
use sqlx::PgPool;

use super::BoxError;

/// List filter for the public catalog
pub struct ProductFilter {
    pub category_id: Option<i64>,
    pub include_inactive: bool,
    pub limit: i64,
    pub offset: i64,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            category_id: None,
            include_inactive: false,
            limit: 50,
            offset: 0,
        }
    }
}

pub async fn list_products(
    pool: &PgPool,
    filter: &ProductFilter,
) -> Result<Vec<ProductListItem>, BoxError> {
    let rows: Vec<ProductListItem> = sqlx::query_as(
        r#"
        SELECT p.id, p.name, p.category_id, c.name AS category_name,
               p.price, p.original_price, p.image, p.stock, p.is_active
        FROM products p
        LEFT JOIN categories c ON c.id = p.category_id
        WHERE ($1::bigint IS NULL OR p.category_id = $1)
          AND (p.is_active OR $2)
        ORDER BY p.sort_order, p.id
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(filter.category_id)
    .bind(filter.include_inactive)
    .bind(filter.limit)
    .bind(filter.offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_product(pool: &PgPool, id: i64) -> Result<Option<Product>, BoxError> {
    let row: Option<Product> = sqlx::query_as(
        r#"
        SELECT id, name, description, category_id, price, original_price,
               image, stock, sort_order, is_active, created_at, updated_at
        FROM products WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create_product(pool: &PgPool, data: &ProductCreate) -> Result<Product, BoxError> {
    let now = now_millis();
    let row: Product = sqlx::query_as(
        r#"
        INSERT INTO products (
            name, description, category_id, price, original_price,
            image, stock, sort_order, is_active, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, $9, $9)
        RETURNING id, name, description, category_id, price, original_price,
                  image, stock, sort_order, is_active, created_at, updated_at
        "#,
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.category_id)
    .bind(data.price)
    .bind(data.original_price)
    .bind(&data.image)
    .bind(data.stock)
    .bind(data.sort_order.unwrap_or(0))
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update_product(
    pool: &PgPool,
    id: i64,
    data: &ProductUpdate,
) -> Result<Option<Product>, BoxError> {
    let now = now_millis();
    let row: Option<Product> = sqlx::query_as(
        r#"
        UPDATE products SET
            name = COALESCE($1, name),
            description = COALESCE($2, description),
            category_id = COALESCE($3, category_id),
            price = COALESCE($4, price),
            original_price = COALESCE($5, original_price),
            image = COALESCE($6, image),
            stock = COALESCE($7, stock),
            sort_order = COALESCE($8, sort_order),
            is_active = COALESCE($9, is_active),
            updated_at = $10
        WHERE id = $11
        RETURNING id, name, description, category_id, price, original_price,
                  image, stock, sort_order, is_active, created_at, updated_at
        "#,
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.category_id)
    .bind(data.price)
    .bind(data.original_price)
    .bind(&data.image)
    .bind(data.stock)
    .bind(data.sort_order)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete_product(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
