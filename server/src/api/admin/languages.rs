//! Admin language management
//!
//! At most three languages are active at once, so activating a fourth goes
//! through the switch endpoint, which removes and adds in one transaction.
//! Every change rebuilds the snapshot files for the new active set.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::json;

use hanmall_shared::error::ApiResponse;
use hanmall_shared::events::EventKind;
use hanmall_shared::models::{
    AddLanguageRequest, Language, LanguagePackEntry, LanguagePackUpsert, SwitchLanguageRequest,
};

use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
) -> ServiceResult<Json<ApiResponse<Vec<Language>>>> {
    let languages = db::languages::list_languages(&state.pool).await?;
    Ok(Json(ApiResponse::success(languages)))
}

pub async fn add(
    State(state): State<AppState>,
    Json(req): Json<AddLanguageRequest>,
) -> ServiceResult<Json<ApiResponse<Language>>> {
    let language = db::languages::add_language(&state.pool, &req.language_code).await?;
    refresh_after_change(&state, &language.code).await;
    tracing::info!(code = %language.code, "language activated");
    Ok(Json(ApiResponse::success(language)))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ServiceResult<Json<ApiResponse<Language>>> {
    let language = db::languages::remove_language(&state.pool, &code).await?;
    refresh_after_change(&state, &language.code).await;
    tracing::info!(code = %language.code, "language deactivated");
    Ok(Json(ApiResponse::success(language)))
}

/// Swap one active language for another without ever exceeding the active
/// limit in between.
pub async fn switch(
    State(state): State<AppState>,
    Json(req): Json<SwitchLanguageRequest>,
) -> ServiceResult<Json<ApiResponse<Language>>> {
    let (removed, added) = db::languages::switch_language(&state.pool, &req.remove, &req.add).await?;
    refresh_after_change(&state, &added.code).await;
    tracing::info!(removed = %removed.code, added = %added.code, "language switched");
    Ok(Json(ApiResponse::success(added)))
}

#[derive(Debug, Default, Deserialize)]
pub struct PackQuery {
    pub language: Option<String>,
    pub namespace: Option<String>,
}

pub async fn list_pack_entries(
    State(state): State<AppState>,
    Query(query): Query<PackQuery>,
) -> ServiceResult<Json<ApiResponse<Vec<LanguagePackEntry>>>> {
    let entries = db::language_packs::list_entries(
        &state.pool,
        query.language.as_deref(),
        query.namespace.as_deref(),
    )
    .await?;
    Ok(Json(ApiResponse::success(entries)))
}

pub async fn upsert_pack_entry(
    State(state): State<AppState>,
    Json(req): Json<LanguagePackUpsert>,
) -> ServiceResult<Json<ApiResponse<LanguagePackEntry>>> {
    let entry = db::language_packs::upsert_entry(&state.pool, &req).await?;
    refresh_after_change(&state, &entry.language_code).await;
    Ok(Json(ApiResponse::success(entry)))
}

pub async fn delete_pack_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<ApiResponse<()>>> {
    use hanmall_shared::error::{AppError, ErrorCode};
    if !db::language_packs::delete_entry(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::LanguagePackNotFound).into());
    }
    Ok(Json(ApiResponse::ok()))
}

async fn refresh_after_change(state: &AppState, language_code: &str) {
    if let Err(e) = state.snapshots.generate(&state.pool).await {
        tracing::warn!(error = ?e, "snapshot regeneration after language change failed");
    }
    state.events.publish(
        EventKind::LanguagePackUpdate,
        json!({ "language": language_code }),
    );
}
