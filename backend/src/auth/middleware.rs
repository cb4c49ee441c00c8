//! Request authentication
//!
//! Provides the Axum extractor that validates the bearer token and
//! exposes the verified identity to handlers.

use crate::auth::Claims;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::debug;
use uuid::Uuid;

/// Authenticated identity extracted from a verified JWT
///
/// Adding this as a handler argument makes the route protected: requests
/// without a valid bearer token are rejected with 401 before the handler
/// runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub claims: Claims,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let token = bearer_token(&parts.headers)?;

        let claims = app_state
            .credentials()
            .verify_token(token)
            .into_result()
            .map_err(|e| {
                debug!(reason = %e, "Bearer token rejected");
                ApiError::Unauthorized(e.to_string())
            })?;

        let user_id = Uuid::parse_str(&claims.user_id)
            .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))?;

        Ok(AuthUser {
            user_id,
            username: claims.username.clone(),
            claims,
        })
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))
}
