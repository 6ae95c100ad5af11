//! Polka billing webhook handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode};
use chirpy_core::auth::credentials::{extract_api_key, verify_api_key};

use crate::AppState;
use crate::error::AppResult;
use crate::models::PolkaWebhookRequest;
use crate::services::webhooks;

/// `POST /api/polka/webhooks`: requires `Authorization: ApiKey <key>`.
///
/// The key is checked before the body is parsed.
pub async fn polka_webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PolkaWebhookRequest>, JsonRejection>,
) -> AppResult<StatusCode> {
    let presented = extract_api_key(&headers)?;
    verify_api_key(&presented, &state.config.polka_key)?;

    let Json(event) = payload?;
    webhooks::handle_polka_event(&*state.store, &event).await?;
    Ok(StatusCode::NO_CONTENT)
}
