//! UI section database operations

use hanmall_shared::models::{UiSection, UiSectionCreate, UiSectionUpdate};
use hanmall_shared::util::now_millis;
use sqlx::PgPool;

use super::BoxError;

const SECTION_COLUMNS: &str = "id, key, section_type, title, data, sort_order, \
     is_active, translations, created_at, updated_at";

pub async fn list_sections(pool: &PgPool, only_active: bool) -> Result<Vec<UiSection>, BoxError> {
    let rows: Vec<UiSection> = sqlx::query_as(&format!(
        "SELECT {SECTION_COLUMNS} FROM ui_sections
         WHERE is_active OR NOT $1
         ORDER BY sort_order, id"
    ))
    .bind(only_active)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_section(pool: &PgPool, id: i64) -> Result<Option<UiSection>, BoxError> {
    let row: Option<UiSection> = sqlx::query_as(&format!(
        "SELECT {SECTION_COLUMNS} FROM ui_sections WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn key_exists(pool: &PgPool, key: &str) -> Result<bool, BoxError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM ui_sections WHERE key = $1)")
            .bind(key)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

pub async fn create_section(pool: &PgPool, data: &UiSectionCreate) -> Result<UiSection, BoxError> {
    let now = now_millis();
    let row: UiSection = sqlx::query_as(&format!(
        "INSERT INTO ui_sections (key, section_type, title, data, sort_order, is_active, translations, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, TRUE, $6, $7, $7)
         RETURNING {SECTION_COLUMNS}"
    ))
    .bind(&data.key)
    .bind(&data.section_type)
    .bind(&data.title)
    .bind(&data.data)
    .bind(data.sort_order.unwrap_or(0))
    .bind(&data.translations)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update_section(
    pool: &PgPool,
    id: i64,
    data: &UiSectionUpdate,
) -> Result<Option<UiSection>, BoxError> {
    let now = now_millis();
    let row: Option<UiSection> = sqlx::query_as(&format!(
        "UPDATE ui_sections SET
            section_type = COALESCE($1, section_type),
            title = COALESCE($2, title),
            data = COALESCE($3, data),
            sort_order = COALESCE($4, sort_order),
            is_active = COALESCE($5, is_active),
            translations = COALESCE($6, translations),
            updated_at = $7
         WHERE id = $8
         RETURNING {SECTION_COLUMNS}"
    ))
    .bind(&data.section_type)
    .bind(&data.title)
    .bind(&data.data)
    .bind(data.sort_order)
    .bind(data.is_active)
    .bind(&data.translations)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete_section(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM ui_sections WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Persist a new display order: position in `ids` becomes `sort_order`.
pub async fn update_section_order(pool: &PgPool, ids: &[i64]) -> Result<(), BoxError> {
    if ids.is_empty() {
        return Ok(());
    }
    let now = now_millis();
    let orders: Vec<i32> = (0..ids.len() as i32).collect();
    sqlx::query(
        "UPDATE ui_sections SET sort_order = u.sort_order, updated_at = $3
         FROM (SELECT * FROM UNNEST($1::bigint[], $2::integer[])) AS u(id, sort_order)
         WHERE ui_sections.id = u.id",
    )
    .bind(ids)
    .bind(&orders)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_section_visibility(
    pool: &PgPool,
    id: i64,
    visible: bool,
) -> Result<bool, BoxError> {
    let result = sqlx::query("UPDATE ui_sections SET is_active = $1, updated_at = $2 WHERE id = $3")
        .bind(visible)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
