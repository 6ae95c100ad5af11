//! Chirp service: create, list, fetch and delete chirps.

use chirpy_core::auth::{Principal, ensure_owner};
use chirpy_core::models::chirps::{SortOrder, validate_chirp_body};
use chirpy_core::store::Store;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{ChirpResponse, ListChirpsParams};

/// Parse a chirp id from a path segment.
pub fn parse_chirp_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation("Invalid Chirp ID".into()))
}

/// Post a chirp as `principal`. An invalid body is rejected before anything
/// is written.
pub async fn create_chirp(
    store: &dyn Store,
    principal: Principal,
    body: &str,
) -> AppResult<ChirpResponse> {
    validate_chirp_body(body)?;
    let chirp = store.create_chirp(body, principal.user_id()).await?;
    info!(chirp_id = %chirp.id, user_id = %chirp.user_id, "chirp created");
    Ok(chirp.into())
}

/// List chirps, optionally filtered by author, ordered by creation time.
pub async fn list_chirps(
    store: &dyn Store,
    params: &ListChirpsParams,
) -> AppResult<Vec<ChirpResponse>> {
    let order: SortOrder = params.sort.as_deref().unwrap_or_default().parse()?;
    let author = match params.author_id.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            Uuid::parse_str(raw)
                .map_err(|e| AppError::Validation(format!("invalid author_id: {e}")))?,
        ),
    };
    let chirps = store.list_chirps(author, order).await?;
    Ok(chirps.into_iter().map(ChirpResponse::from).collect())
}

pub async fn get_chirp(store: &dyn Store, id: Uuid) -> AppResult<ChirpResponse> {
    store
        .get_chirp(id)
        .await?
        .map(ChirpResponse::from)
        .ok_or_else(|| AppError::NotFound("chirp not found".into()))
}

/// Delete a chirp owned by `principal`.
///
/// A missing chirp is 404 even for non-owners; ownership is checked second.
pub async fn delete_chirp(store: &dyn Store, principal: Principal, id: Uuid) -> AppResult<()> {
    let chirp = store
        .get_chirp(id)
        .await?
        .ok_or_else(|| AppError::NotFound("chirp not found".into()))?;

    ensure_owner(principal, chirp.user_id)?;

    if !store.delete_chirp(chirp.id).await? {
        return Err(AppError::NotFound("chirp not found".into()));
    }
    info!(chirp_id = %chirp.id, user_id = %principal.user_id(), "chirp deleted");
    Ok(())
}
