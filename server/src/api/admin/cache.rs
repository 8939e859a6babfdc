//! Admin cache controls and event inspection

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::json;

use hanmall_shared::error::{ApiResponse, AppError, ErrorCode};
use hanmall_shared::events::StoreEvent;
use hanmall_shared::models::{CacheGenerateResult, CacheStatus};

use crate::db;
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    /// Clients send `?action=status`; it is the only action GET supports.
    pub action: Option<String>,
}

fn validate_action(action: Option<&str>) -> Result<(), AppError> {
    match action {
        None | Some("status") => Ok(()),
        Some(other) => Err(AppError::validation(format!("Unknown cache action: {other}"))),
    }
}

pub async fn status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> ServiceResult<Json<ApiResponse<CacheStatus>>> {
    validate_action(query.action.as_deref())?;
    let active = db::languages::active_language_codes(&state.pool).await?;
    Ok(Json(ApiResponse::success(state.snapshots.status(&active))))
}

pub async fn regenerate(
    State(state): State<AppState>,
) -> ServiceResult<Json<ApiResponse<CacheGenerateResult>>> {
    let result = state.snapshots.generate(&state.pool).await.map_err(|e| match e {
        ServiceError::App(app) => ServiceError::App(app),
        ServiceError::Db(db) => {
            tracing::error!(error = %db, "snapshot regeneration failed");
            ServiceError::App(AppError::new(ErrorCode::CacheGenerationFailed))
        }
    })?;
    Ok(Json(ApiResponse::success(result)))
}

pub async fn clear(
    State(state): State<AppState>,
) -> ServiceResult<Json<ApiResponse<serde_json::Value>>> {
    let removed = state
        .snapshots
        .clear()
        .map_err(|e| ServiceError::Db(e.into()))?;
    tracing::info!(removed, "snapshot cache cleared");
    Ok(Json(ApiResponse::success(json!({ "removed": removed }))))
}

/// The hub's retained history, for debugging push delivery. Never replayed
/// to SSE clients.
pub async fn recent_events(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<StoreEvent>>> {
    Json(ApiResponse::success(state.events.recent()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_action_is_accepted() {
        assert!(validate_action(None).is_ok());
        assert!(validate_action(Some("status")).is_ok());
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!(validate_action(Some("flush")).is_err());
    }
}
