//! Authentication routes
//!
//! Provides endpoints for sign-up, sign-in, and token-protected identity
//! checks.
//!
//! # Performance
//!
//! Password hashing runs on the blocking thread pool inside the
//! credential workflow, so handlers never block the async runtime.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use credential_service_shared::{
    validation::validate_sign_up, AuthResponse, SecretResponse, SignInRequest, SignUpRequest,
    SignUpResponse,
};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(sign_up))
        .route("/signin", post(sign_in))
        .route("/authenticate", get(authenticate))
        .route("/secret", get(secret))
}

/// Register a new user
///
/// POST /signup
async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> ApiResult<(StatusCode, Json<SignUpResponse>)> {
    validate_sign_up(&req)?;

    let user = state
        .credentials()
        .register(&req.username, &req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            user_id: user.id.to_string(),
            username: user.username,
        }),
    ))
}

/// Sign in with username and password
///
/// POST /signin
async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let issued = state
        .credentials()
        .authenticate(&req.username, &req.password)
        .await?;

    Ok(Json(AuthResponse {
        token: issued.token,
        token_type: "Bearer".to_string(),
        expires_in: issued.expires_in,
    }))
}

/// Check that the bearer token is valid
///
/// GET /authenticate
async fn authenticate(_auth_user: AuthUser) -> StatusCode {
    StatusCode::OK
}

/// Return the identity carried by the bearer token
///
/// GET /secret
async fn secret(auth_user: AuthUser) -> Json<SecretResponse> {
    Json(SecretResponse {
        user_id: auth_user.user_id.to_string(),
        username: auth_user.username,
    })
}
