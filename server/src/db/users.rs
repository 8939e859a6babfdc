//! User database operations

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::BoxError;

/// User row (auth only; profile fields live with the storefront)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: i64,
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, BoxError> {
    let row: Option<User> = sqlx::query_as(
        "SELECT id, email, hashed_password, name, role, is_active, created_at
         FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create_user(
    pool: &PgPool,
    email: &str,
    hashed_password: &str,
    name: &str,
    role: &str,
) -> Result<User, BoxError> {
    let row: User = sqlx::query_as(
        "INSERT INTO users (email, hashed_password, name, role, is_active, created_at)
         VALUES ($1, $2, $3, $4, TRUE, $5)
         RETURNING id, email, hashed_password, name, role, is_active, created_at",
    )
    .bind(email)
    .bind(hashed_password)
    .bind(name)
    .bind(role)
    .bind(hanmall_shared::util::now_millis())
    .fetch_one(pool)
    .await?;
    Ok(row)
}
