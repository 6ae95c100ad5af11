//! Chirp request handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{ChirpResponse, CreateChirpRequest, ListChirpsParams};
use crate::services::chirps;

/// `POST /api/chirps`: post a chirp as the authenticated user.
pub async fn create_chirp_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(principal)): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateChirpRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ChirpResponse>)> {
    let Json(body) = payload?;
    let chirp = chirps::create_chirp(&*state.store, principal, &body.body).await?;
    Ok((StatusCode::CREATED, Json(chirp)))
}

/// `GET /api/chirps?author_id=&sort=`: list chirps.
pub async fn list_chirps_handler(
    State(state): State<AppState>,
    Query(params): Query<ListChirpsParams>,
) -> AppResult<Json<Vec<ChirpResponse>>> {
    let chirps = chirps::list_chirps(&*state.store, &params).await?;
    Ok(Json(chirps))
}

/// `GET /api/chirps/{id}`: fetch one chirp.
pub async fn get_chirp_handler(
    State(state): State<AppState>,
    Path(chirp_id): Path<String>,
) -> AppResult<Json<ChirpResponse>> {
    let id = chirps::parse_chirp_id(&chirp_id)?;
    let chirp = chirps::get_chirp(&*state.store, id).await?;
    Ok(Json(chirp))
}

/// `DELETE /api/chirps/{id}`: delete one of the caller's chirps.
pub async fn delete_chirp_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(principal)): Extension<AuthenticatedUser>,
    Path(chirp_id): Path<String>,
) -> AppResult<StatusCode> {
    let id = chirps::parse_chirp_id(&chirp_id)?;
    chirps::delete_chirp(&*state.store, principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
