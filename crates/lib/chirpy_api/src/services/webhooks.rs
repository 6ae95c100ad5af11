//! Polka billing webhook.

use chirpy_core::store::Store;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::PolkaWebhookRequest;

/// The only event Polka sends that we act on.
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

/// Apply a webhook event. Unknown events are acknowledged and ignored.
pub async fn handle_polka_event(store: &dyn Store, event: &PolkaWebhookRequest) -> AppResult<()> {
    if event.event != USER_UPGRADED_EVENT {
        debug!(event = %event.event, "ignoring polka event");
        return Ok(());
    }

    let user_id = Uuid::parse_str(&event.data.user_id)
        .map_err(|e| AppError::Validation(format!("invalid user_id: {e}")))?;
    if !store.upgrade_to_chirpy_red(user_id).await? {
        return Err(AppError::NotFound("user not found".into()));
    }
    info!(%user_id, "user upgraded to chirpy red");
    Ok(())
}
