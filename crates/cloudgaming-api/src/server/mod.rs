//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use cloudgaming_common::{AppConfig, AppError, CredentialStore, SessionTokenService};
use cloudgaming_core::{AccountRepository, GameRepository};
use cloudgaming_db::{
    create_pool, run_migrations, InMemoryAccountRepository, InMemoryGameRepository,
    PgAccountRepository, PgGameRepository,
};
use cloudgaming_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router();
    let router = apply_middleware(router, state.config());
    router.with_state(state)
}

/// Connect to PostgreSQL, run migrations if configured, and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&config.database)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {e}")))?;
    }

    build_state(
        config,
        Arc::new(PgAccountRepository::new(pool.clone())),
        Arc::new(PgGameRepository::new(pool)),
    )
}

/// Create AppState backed by in-memory repositories with the sample catalog
///
/// Nothing is persisted; used for tests and local runs without a database.
pub fn create_in_memory_app_state(config: AppConfig) -> Result<AppState, AppError> {
    build_state(
        config,
        Arc::new(InMemoryAccountRepository::new()),
        Arc::new(InMemoryGameRepository::seeded()),
    )
}

fn build_state(
    config: AppConfig,
    account_repo: Arc<dyn AccountRepository>,
    game_repo: Arc<dyn GameRepository>,
) -> Result<AppState, AppError> {
    let credentials = CredentialStore::new(&config.password)?;
    let tokens = SessionTokenService::from_config(&config.jwt)?;

    let service_context = ServiceContextBuilder::new()
        .account_repo(account_repo)
        .game_repo(game_repo)
        .credentials(credentials)
        .tokens(tokens)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server until Ctrl-C
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
