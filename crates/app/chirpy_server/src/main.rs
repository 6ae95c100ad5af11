//! Chirpy HTTP server binary.
//!
//! Reads `.env` and the process environment, connects the chosen store and
//! serves the API until interrupted.

use std::sync::Arc;

use chirpy_api::AppState;
use chirpy_api::config::ApiConfig;
use chirpy_core::store::{MemoryStore, PgStore, Store};
use clap::{Parser, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

const DEFAULT_LOG_FILTER: &str = "info,chirpy_api=debug,chirpy_core=debug";

/// Persistence backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Storage {
    /// PostgreSQL, migrated on start-up.
    Postgres,
    /// Process-local maps; everything is lost on exit.
    Memory,
}

/// CLI arguments for the Chirpy server.
#[derive(Parser, Debug)]
#[command(name = "chirpy_server", about = "Chirpy micro-blog API server")]
struct Args {
    /// Port to listen on. Overrides the port in `BIND_ADDR`.
    #[arg(long)]
    port: Option<u16>,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DB_URL",
        default_value = "postgres://localhost:5432/chirpy"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Persistence backend.
    #[arg(long, value_enum, default_value_t = Storage::Postgres)]
    storage: Storage,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER))?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env()?;
    config.database_url = args.database_url.clone();
    if let Some(port) = args.port {
        config.bind_addr = with_port(&config.bind_addr, port);
    }
    config.validate()?;

    info!(
        bind_addr = %config.bind_addr,
        platform = ?config.platform,
        storage = ?args.storage,
        "starting chirpy_server"
    );

    let store: Arc<dyn Store> = match args.storage {
        Storage::Postgres => {
            info!(max_connections = args.max_connections, "configuring connection pool");
            let pool = PgPoolOptions::new()
                .max_connections(args.max_connections)
                .acquire_timeout(std::time::Duration::from_secs(30))
                .connect(&config.database_url)
                .await?;

            info!("running database migrations");
            chirpy_api::migrate(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
        Storage::Memory => {
            warn!("using in-memory storage; data will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store, config.clone());
    let app = chirpy_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Replace the port of a `host:port` bind address.
fn with_port(bind_addr: &str, port: u16) -> String {
    let host = bind_addr
        .rsplit_once(':')
        .map(|(host, _)| host)
        .unwrap_or(bind_addr);
    format!("{host}:{port}")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
