//! User and session request handlers.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode};
use axum::{Extension, Json};
use chirpy_core::auth::credentials::extract_bearer_token;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{LoginRequest, LoginResponse, RefreshResponse, UserCredentialsRequest, UserResponse};
use crate::services::auth;

/// `POST /api/users`: create a new user account.
pub async fn create_user_handler(
    State(state): State<AppState>,
    payload: Result<Json<UserCredentialsRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let Json(body) = payload?;
    let user = auth::register(&*state.store, &body.email, &body.password).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `PUT /api/users`: replace the caller's email and password.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(principal)): Extension<AuthenticatedUser>,
    payload: Result<Json<UserCredentialsRequest>, JsonRejection>,
) -> AppResult<Json<UserResponse>> {
    let Json(body) = payload?;
    let user = auth::update_user(&*state.store, principal, &body.email, &body.password).await?;
    Ok(Json(user))
}

/// `POST /api/login`: authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(body) = payload?;
    let resp = auth::login(&*state.store, &body, &state.config.jwt_secret).await?;
    Ok(Json(resp))
}

/// `POST /api/refresh`: exchange the bearer refresh token for an access token.
pub async fn refresh_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<RefreshResponse>> {
    let refresh_token = extract_bearer_token(&headers)?;
    let resp =
        auth::refresh_access_token(&*state.store, &refresh_token, &state.config.jwt_secret)
            .await?;
    Ok(Json(resp))
}

/// `POST /api/revoke`: revoke the bearer refresh token.
pub async fn revoke_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<StatusCode> {
    let refresh_token = extract_bearer_token(&headers)?;
    auth::revoke_refresh_token(&*state.store, &refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}
