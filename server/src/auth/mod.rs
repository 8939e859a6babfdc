//! JWT authentication for storefront and admin routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use hanmall_shared::error::{ApiResponse, AppError, ErrorCode};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// User email
    pub email: String,
    /// `admin` or `customer`
    pub role: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated identity extracted from JWT
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
    pub role: String,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// Create a JWT token for a user
pub fn create_token(
    user_id: i64,
    email: &str,
    role: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Pull the token out of `Authorization: Bearer ...` or, as a fallback for
/// browser requests, the `auth-token` cookie.
fn extract_token(request: &Request) -> Option<String> {
    if let Some(bearer) = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        return Some(bearer.to_string());
    }

    let cookies = request.headers().get("Cookie")?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == "auth-token" || name == "accessToken").then(|| value.to_string())
    })
}

fn decode_identity(request: &Request, secret: &str) -> Result<Identity, Response> {
    let token = extract_token(request)
        .ok_or_else(|| AppError::not_authenticated().into_response())?;

    let token_data = jsonwebtoken::decode::<Claims>(
        &token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        AppError::new(ErrorCode::TokenInvalid).into_response()
    })?;

    let user_id = token_data
        .claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::new(ErrorCode::TokenInvalid).into_response())?;

    Ok(Identity {
        user_id,
        email: token_data.claims.email,
        role: token_data.claims.role,
    })
}

/// Middleware that requires any authenticated user
pub async fn user_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let identity = decode_identity(&request, &state.jwt_secret)?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Middleware that requires the `admin` role
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let identity = decode_identity(&request, &state.jwt_secret)?;
    if !identity.is_admin() {
        let body: ApiResponse<()> = AppError::new(ErrorCode::AdminRequired).into();
        return Err(body.into_response());
    }
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let token = create_token(7, "admin@hanmall.kr", "admin", "test-secret").unwrap();
        let data = jsonwebtoken::decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(data.claims.sub, "7");
        assert_eq!(data.claims.role, "admin");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token(7, "admin@hanmall.kr", "admin", "test-secret").unwrap();
        let result = jsonwebtoken::decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"other-secret"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }
}
