//! Admin endpoints: file-server metrics and the dev-only reset.

use axum::extract::State;
use axum::response::Html;
use tracing::{info, warn};

use crate::AppState;
use crate::config::Platform;
use crate::error::{AppError, AppResult};

/// `GET /admin/metrics`: HTML page with the file-server hit count.
pub async fn metrics_handler(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {} times!</p>\n  </body>\n</html>\n",
        state.hits.get()
    ))
}

/// `POST /admin/reset`: delete every user and zero the hit counter.
///
/// Refused with 403 unless the platform is `dev`.
pub async fn reset_handler(State(state): State<AppState>) -> AppResult<&'static str> {
    if state.config.platform != Platform::Dev {
        warn!(platform = ?state.config.platform, "reset refused outside dev");
        return Err(AppError::Forbidden("Forbidden".into()));
    }

    state.store.delete_all_users().await?;
    state.hits.reset();

    info!("hit counter and users reset");
    Ok("Hits counter reset to 0 and deleted all users")
}
