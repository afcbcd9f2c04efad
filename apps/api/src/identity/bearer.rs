use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

pub const MISSING_HEADER: &str = "Missing or invalid authorization header";
pub const INVALID_TOKEN: &str = "Invalid or expired token";

/// The authenticated caller. Extracting it rejects the request with 401
/// unless the `Authorization: Bearer <token>` header names a live user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// The token is the second space-separated segment after `Bearer `.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let header = header?;
    if !header.starts_with("Bearer ") {
        return None;
    }
    Some(header.split(' ').nth(1).unwrap_or(""))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        let token = bearer_token(header)
            .ok_or_else(|| AppError::Unauthorized(MISSING_HEADER.to_string()))?;
        if token.is_empty() {
            return Err(AppError::Unauthorized(INVALID_TOKEN.to_string()));
        }

        match state.identity.get_user(token).await {
            Ok(Some(identity)) => Ok(AuthUser {
                id: identity.id,
                email: identity.email,
            }),
            Ok(None) => Err(AppError::Unauthorized(INVALID_TOKEN.to_string())),
            Err(e) => {
                warn!("Identity lookup failed: {e}");
                Err(AppError::Unauthorized(INVALID_TOKEN.to_string()))
            }
        }
    }
}
