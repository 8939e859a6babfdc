//! Language pack database operations

use hanmall_shared::models::{LanguagePackEntry, LanguagePackUpsert};
use hanmall_shared::util::now_millis;
use sqlx::PgPool;

use super::BoxError;

const PACK_COLUMNS: &str =
    "id, language_code, namespace, key, value, category, is_active, version, updated_at";

pub async fn list_entries(
    pool: &PgPool,
    language_code: Option<&str>,
    namespace: Option<&str>,
) -> Result<Vec<LanguagePackEntry>, BoxError> {
    let rows: Vec<LanguagePackEntry> = sqlx::query_as(&format!(
        "SELECT {PACK_COLUMNS} FROM language_packs
         WHERE ($1::text IS NULL OR language_code = $1)
           AND ($2::text IS NULL OR namespace = $2)
         ORDER BY language_code, namespace, key"
    ))
    .bind(language_code)
    .bind(namespace)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Insert or update an entry; version is bumped on every update.
pub async fn upsert_entry(
    pool: &PgPool,
    data: &LanguagePackUpsert,
) -> Result<LanguagePackEntry, BoxError> {
    let row: LanguagePackEntry = sqlx::query_as(&format!(
        "INSERT INTO language_packs (language_code, namespace, key, value, category, is_active, version, updated_at)
         VALUES ($1, $2, $3, $4, $5, TRUE, 1, $6)
         ON CONFLICT (language_code, namespace, key)
         DO UPDATE SET
            value = EXCLUDED.value,
            category = EXCLUDED.category,
            version = language_packs.version + 1,
            updated_at = EXCLUDED.updated_at
         RETURNING {PACK_COLUMNS}"
    ))
    .bind(&data.language_code)
    .bind(&data.namespace)
    .bind(&data.key)
    .bind(&data.value)
    .bind(&data.category)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn delete_entry(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM language_packs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// All active entries for one language, keyed `namespace.key` → value.
/// Used when projecting section snapshots.
pub async fn translation_map(
    pool: &PgPool,
    language_code: &str,
) -> Result<std::collections::HashMap<String, String>, BoxError> {
    let rows: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT namespace, key, value FROM language_packs
         WHERE language_code = $1 AND is_active",
    )
    .bind(language_code)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(ns, key, value)| (format!("{ns}.{key}"), value))
        .collect())
}
