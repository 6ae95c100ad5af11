//! Authentication middleware: Bearer token extraction and JWT verification.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chirpy_core::auth::credentials::extract_bearer_token;
use chirpy_core::auth::jwt::validate_access_token;
use chirpy_core::auth::Principal;

use crate::AppState;
use crate::error::AppError;

/// Key used to store the resolved [`Principal`] in request extensions.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Principal);

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies the
/// access token, and injects `AuthenticatedUser` into request extensions.
///
/// Runs before the body is read, so an unauthenticated request is rejected
/// with 401 before any validation or lookup happens.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers())?;
    let user_id = validate_access_token(&token, &state.config.jwt_secret)?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser(Principal(user_id)));

    Ok(next.run(request).await)
}
