//! Admin UI section management
//!
//! Every mutation regenerates the per-language snapshots; order and
//! visibility changes report per-language sync results and answer 207 when
//! only some languages could be rebuilt.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;

use hanmall_shared::error::{ApiResponse, AppError, ErrorCode};
use hanmall_shared::events::EventKind;
use hanmall_shared::models::{SyncOutcome, UiSection, UiSectionCreate, UiSectionUpdate};

use crate::auth::Identity;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::sync;

#[derive(Deserialize)]
pub struct ReorderRequest {
    /// Section IDs in the new display order
    pub ids: Vec<i64>,
}

#[derive(Deserialize)]
pub struct VisibilityRequest {
    pub is_active: bool,
}

pub async fn list(
    State(state): State<AppState>,
) -> ServiceResult<Json<ApiResponse<Vec<UiSection>>>> {
    let sections = db::ui_sections::list_sections(&state.pool, false).await?;
    Ok(Json(ApiResponse::success(sections)))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<UiSectionCreate>,
) -> ServiceResult<Json<ApiResponse<UiSection>>> {
    if req.key.trim().is_empty() {
        return Err(AppError::validation("Section key is required").into());
    }
    if db::ui_sections::key_exists(&state.pool, &req.key).await? {
        return Err(AppError::new(ErrorCode::SectionKeyConflict)
            .with_detail("key", req.key.clone())
            .into());
    }

    let section = db::ui_sections::create_section(&state.pool, &req).await?;
    refresh_after_edit(&state, section.id).await;
    Ok(Json(ApiResponse::success(section)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UiSectionUpdate>,
) -> ServiceResult<Json<ApiResponse<UiSection>>> {
    let section = db::ui_sections::update_section(&state.pool, id, &req)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::SectionNotFound))?;
    refresh_after_edit(&state, section.id).await;
    Ok(Json(ApiResponse::success(section)))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<ApiResponse<()>>> {
    if !db::ui_sections::delete_section(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::SectionNotFound).into());
    }
    refresh_after_edit(&state, id).await;
    Ok(Json(ApiResponse::ok()))
}

/// PUT /api/admin/ui-sections/order — persist a new display order and fan it
/// out to every active language.
pub async fn reorder(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<ReorderRequest>,
) -> ServiceResult<Response> {
    if req.ids.is_empty() {
        return Err(AppError::validation("Section order cannot be empty").into());
    }
    let outcome =
        sync::sync_section_order(&state.pool, &state.snapshots, &req.ids, &identity.email).await?;
    publish_section_event(&state, json!({ "order": req.ids }));
    Ok(outcome_response(outcome))
}

/// PUT /api/admin/ui-sections/{id}/visibility
pub async fn set_visibility(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
    Json(req): Json<VisibilityRequest>,
) -> ServiceResult<Response> {
    if db::ui_sections::get_section(&state.pool, id).await?.is_none() {
        return Err(AppError::new(ErrorCode::SectionNotFound).into());
    }
    let outcome = sync::sync_section_visibility(
        &state.pool,
        &state.snapshots,
        id,
        req.is_active,
        &identity.email,
    )
    .await?;
    publish_section_event(&state, json!({ "section_id": id, "is_active": req.is_active }));
    Ok(outcome_response(outcome))
}

/// Map a sync outcome to a response: all languages → 200, some → 207,
/// none → the sync-failure error.
fn outcome_response(outcome: SyncOutcome) -> Response {
    if outcome.is_total_failure() {
        let err = AppError::new(ErrorCode::CacheGenerationFailed)
            .with_detail("errors", serde_json::to_value(&outcome.errors).unwrap_or_default());
        return err.into_response();
    }
    if outcome.is_partial_failure() {
        tracing::warn!(
            failed = outcome.errors.len(),
            updated = outcome.updated_languages.len(),
            "section sync partially failed"
        );
        return (
            StatusCode::MULTI_STATUS,
            Json(ApiResponse::success_with_message(
                ErrorCode::SyncPartialFailure.message(),
                outcome,
            )),
        )
            .into_response();
    }
    Json(ApiResponse::success(outcome)).into_response()
}

async fn refresh_after_edit(state: &AppState, section_id: i64) {
    if let Err(e) = state.snapshots.generate(&state.pool).await {
        tracing::warn!(error = ?e, "snapshot regeneration after section edit failed");
    }
    publish_section_event(state, json!({ "section_id": section_id }));
}

fn publish_section_event(state: &AppState, data: serde_json::Value) {
    state.events.publish(EventKind::UiSectionUpdate, data);
}
