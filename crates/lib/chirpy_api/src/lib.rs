//! # chirpy_api
//!
//! HTTP API library for Chirpy.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use chirpy_core::store::Store;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{admin, auth, chirps, health, webhooks};
use crate::metrics::HitCounter;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend.
    pub store: Arc<dyn Store>,
    /// API configuration.
    pub config: ApiConfig,
    /// File-server hits since start-up or the last reset.
    pub hits: Arc<HitCounter>,
}

impl AppState {
    /// State with a fresh hit counter.
    pub fn new(store: Arc<dyn Store>, config: ApiConfig) -> Self {
        Self {
            store,
            config,
            hits: Arc::new(HitCounter::new()),
        }
    }
}

/// Run embedded database migrations.
///
/// Delegates to `chirpy_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    chirpy_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Static files; every request counts as a hit.
    let fileserver = ServiceBuilder::new()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            metrics::count_hits,
        ))
        .service(ServeDir::new(&state.config.fileserver_root));

    // Public routes (no auth required)
    let public = Router::new()
        .route("/api/healthz", get(health::healthz))
        .route("/admin/metrics", get(admin::metrics_handler))
        .route("/admin/reset", post(admin::reset_handler))
        .route("/api/users", post(auth::create_user_handler))
        .route("/api/login", post(auth::login_handler))
        .route("/api/refresh", post(auth::refresh_handler))
        .route("/api/revoke", post(auth::revoke_handler))
        .route("/api/chirps", get(chirps::list_chirps_handler))
        .route("/api/chirps/{chirp_id}", get(chirps::get_chirp_handler))
        .route("/api/polka/webhooks", post(webhooks::polka_webhook_handler));

    // Protected routes (require a valid access token)
    let protected = Router::new()
        .route("/api/users", put(auth::update_user_handler))
        .route("/api/chirps", post(chirps::create_chirp_handler))
        .route(
            "/api/chirps/{chirp_id}",
            delete(chirps::delete_chirp_handler),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .nest_service("/app", fileserver)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
