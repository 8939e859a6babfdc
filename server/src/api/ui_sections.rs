//! Public UI configuration
//!
//! GET /api/ui-sections?language=ko — the storefront's homepage layout,
//! served from the per-language snapshot file when fresh and rebuilt from the
//! database when not.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use hanmall_shared::error::ApiResponse;
use hanmall_shared::models::{Language, LanguageSnapshot};

use crate::cache;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UiSectionsQuery {
    pub language: Option<String>,
}

pub async fn get_ui_sections(
    State(state): State<AppState>,
    Query(query): Query<UiSectionsQuery>,
) -> ServiceResult<Json<ApiResponse<LanguageSnapshot>>> {
    let requested = query.language.unwrap_or_else(|| state.default_language.clone());

    // Unknown or inactive language falls back to the default
    let active = db::languages::active_language_codes(&state.pool).await?;
    let language = if active.contains(&requested) {
        requested
    } else {
        state.default_language.clone()
    };

    if state.snapshots.is_valid(&active) {
        if let Some(snapshot) = state.snapshots.read(&language) {
            return Ok(Json(ApiResponse::success(snapshot)));
        }
    }

    // Stale or missing snapshot: serve from the database and rebuild on the
    // side so the next request hits the file again.
    let sections = db::ui_sections::list_sections(&state.pool, true).await?;
    let strings = db::language_packs::translation_map(&state.pool, &language).await?;
    let snapshot = cache::build_snapshot(&language, &sections, strings);

    let cache = state.snapshots.clone();
    let pool = state.pool.clone();
    tokio::spawn(async move {
        if let Err(e) = cache.generate(&pool).await {
            tracing::warn!(error = ?e, "background snapshot regeneration failed");
        }
    });

    Ok(Json(ApiResponse::success(snapshot)))
}

pub async fn list_active_languages(
    State(state): State<AppState>,
) -> ServiceResult<Json<ApiResponse<Vec<Language>>>> {
    let languages = db::languages::list_languages(&state.pool)
        .await?
        .into_iter()
        .filter(|l| l.is_active)
        .collect();
    Ok(Json(ApiResponse::success(languages)))
}
