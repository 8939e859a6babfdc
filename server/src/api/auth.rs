//! Registration and login
//!
//! POST /api/auth/register — create a customer account
//! POST /api/auth/login    — issue a JWT (admin and customer share this route)

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use hanmall_shared::error::{ApiResponse, AppError, ErrorCode};

use crate::auth::create_token;
use crate::db;
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;
use crate::util::{hash_password, verify_password};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub role: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ServiceResult<Json<ApiResponse<AuthResponse>>> {
    if req.email.is_empty() || !req.email.contains('@') {
        return Err(AppError::validation("A valid email is required").into());
    }
    if req.password.len() < 8 {
        return Err(AppError::validation("Password must be at least 8 characters").into());
    }

    if db::users::find_by_email(&state.pool, &req.email)
        .await?
        .is_some()
    {
        return Err(AppError::conflict("Email is already registered").into());
    }

    let hashed = hash_password(&req.password)
        .map_err(|e| ServiceError::Db(format!("password hash: {e}").into()))?;
    let user = db::users::create_user(&state.pool, &req.email, &hashed, &req.name, "customer")
        .await?;

    let token = create_token(user.id, &user.email, &user.role, &state.jwt_secret)
        .map_err(|e| ServiceError::Db(e.into()))?;
    tracing::info!(user_id = user.id, "new customer registered");

    Ok(Json(ApiResponse::success(AuthResponse {
        token,
        user_id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
    })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ServiceResult<Json<ApiResponse<AuthResponse>>> {
    login_with_role(&state, req, None).await
}

/// POST /api/admin/login — same credential check, but only admin accounts
/// get a token back.
pub async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ServiceResult<Json<ApiResponse<AuthResponse>>> {
    login_with_role(&state, req, Some("admin")).await
}

async fn login_with_role(
    state: &AppState,
    req: LoginRequest,
    required_role: Option<&str>,
) -> ServiceResult<Json<ApiResponse<AuthResponse>>> {
    let user = db::users::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&req.password, &user.hashed_password) {
        return Err(AppError::invalid_credentials().into());
    }
    if !user.is_active {
        return Err(AppError::new(ErrorCode::AccountDisabled).into());
    }
    if let Some(role) = required_role {
        if user.role != role {
            return Err(AppError::new(ErrorCode::AdminRequired).into());
        }
    }

    let token = create_token(user.id, &user.email, &user.role, &state.jwt_secret)
        .map_err(|e| ServiceError::Db(e.into()))?;

    Ok(Json(ApiResponse::success(AuthResponse {
        token,
        user_id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
    })))
}
