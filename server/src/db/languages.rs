//! Language catalog operations and the active-language business rule
//!
//! At most [`MAX_ACTIVE_LANGUAGES`] languages may be active at once, and the
//! default language can never be deactivated. Both rules are enforced here,
//! inside the same transaction as the write they guard.

use hanmall_shared::error::{AppError, ErrorCode};
use hanmall_shared::models::{Language, MAX_ACTIVE_LANGUAGES};
use sqlx::{PgPool, Postgres, Transaction};

use super::BoxError;
use crate::error::ServiceError;

const LANGUAGE_COLUMNS: &str = "id, code, name, native_name, is_active, is_default";

pub async fn list_languages(pool: &PgPool) -> Result<Vec<Language>, BoxError> {
    let rows: Vec<Language> = sqlx::query_as(&format!(
        "SELECT {LANGUAGE_COLUMNS} FROM languages ORDER BY is_default DESC, code"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn active_language_codes(pool: &PgPool) -> Result<Vec<String>, BoxError> {
    let codes: Vec<String> = sqlx::query_scalar(
        "SELECT code FROM languages WHERE is_active ORDER BY is_default DESC, code",
    )
    .fetch_all(pool)
    .await?;
    Ok(codes)
}

/// Checked before the activating UPDATE, in the same transaction as the
/// counting SELECT, so a rejected activation leaves the active count as-is.
fn ensure_language_capacity(active_count: i64) -> Result<(), AppError> {
    if active_count as usize >= MAX_ACTIVE_LANGUAGES {
        return Err(AppError::new(ErrorCode::LanguageLimitReached)
            .with_detail("max", MAX_ACTIVE_LANGUAGES as i64));
    }
    Ok(())
}

async fn activate_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    code: &str,
) -> Result<Language, ServiceError> {
    let language: Option<Language> = sqlx::query_as(&format!(
        "SELECT {LANGUAGE_COLUMNS} FROM languages WHERE code = $1 FOR UPDATE"
    ))
    .bind(code)
    .fetch_optional(&mut **tx)
    .await?;

    let Some(language) = language else {
        return Err(AppError::new(ErrorCode::LanguageNotFound)
            .with_detail("code", code)
            .into());
    };
    if language.is_active {
        return Err(AppError::new(ErrorCode::LanguageAlreadyActive)
            .with_detail("code", code)
            .into());
    }

    let active_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM languages WHERE is_active")
        .fetch_one(&mut **tx)
        .await?;
    ensure_language_capacity(active_count)?;

    let language: Language = sqlx::query_as(&format!(
        "UPDATE languages SET is_active = TRUE WHERE code = $1 RETURNING {LANGUAGE_COLUMNS}"
    ))
    .bind(code)
    .fetch_one(&mut **tx)
    .await?;
    Ok(language)
}

async fn deactivate_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    code: &str,
) -> Result<Language, ServiceError> {
    let language: Option<Language> = sqlx::query_as(&format!(
        "SELECT {LANGUAGE_COLUMNS} FROM languages WHERE code = $1 FOR UPDATE"
    ))
    .bind(code)
    .fetch_optional(&mut **tx)
    .await?;

    let Some(language) = language else {
        return Err(AppError::new(ErrorCode::LanguageNotFound)
            .with_detail("code", code)
            .into());
    };
    if language.is_default {
        return Err(AppError::new(ErrorCode::DefaultLanguageImmutable)
            .with_detail("code", code)
            .into());
    }
    if !language.is_active {
        return Err(AppError::new(ErrorCode::LanguageNotActive)
            .with_detail("code", code)
            .into());
    }

    let language: Language = sqlx::query_as(&format!(
        "UPDATE languages SET is_active = FALSE WHERE code = $1 RETURNING {LANGUAGE_COLUMNS}"
    ))
    .bind(code)
    .fetch_one(&mut **tx)
    .await?;
    Ok(language)
}

/// Activate a language. Fails when the active set is already at its limit;
/// the active count is unchanged on failure.
pub async fn add_language(pool: &PgPool, code: &str) -> Result<Language, ServiceError> {
    let mut tx = pool.begin().await?;
    let language = activate_in_tx(&mut tx, code).await?;
    tx.commit().await?;
    Ok(language)
}

/// Deactivate a language. The default language cannot be removed.
pub async fn remove_language(pool: &PgPool, code: &str) -> Result<Language, ServiceError> {
    let mut tx = pool.begin().await?;
    let language = deactivate_in_tx(&mut tx, code).await?;
    tx.commit().await?;
    Ok(language)
}

/// Swap one active language for another: remove first, then add, in one
/// transaction so a failure on either side leaves the active set untouched.
pub async fn switch_language(
    pool: &PgPool,
    remove: &str,
    add: &str,
) -> Result<(Language, Language), ServiceError> {
    let mut tx = pool.begin().await?;
    let removed = deactivate_in_tx(&mut tx, remove).await?;
    let added = activate_in_tx(&mut tx, add).await?;
    tx.commit().await?;
    Ok((removed, added))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_allows_up_to_the_limit() {
        assert!(ensure_language_capacity(0).is_ok());
        assert!(ensure_language_capacity(MAX_ACTIVE_LANGUAGES as i64 - 1).is_ok());
    }

    #[test]
    fn capacity_rejects_a_fourth_active_language() {
        let err = ensure_language_capacity(MAX_ACTIVE_LANGUAGES as i64).unwrap_err();
        assert_eq!(err.code, ErrorCode::LanguageLimitReached);
    }
}
