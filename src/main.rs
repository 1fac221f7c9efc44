//! DocVault Server: document custody over a remote object store.
//!
//! Main entry point that wires all crates together and starts the server.

use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use docvault_auth::{AccessGate, JwtDecoder, JwtEncoder, PasswordHasher};
use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_core::traits::ObjectStore;
use docvault_database::Database;
use docvault_service::{CustodyPipeline, IdentityService};
use docvault_storage::StagingArea;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(kind = %e.kind, "Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from `.env`, TOML files, and the environment
fn load_configuration() -> Result<AppConfig, AppError> {
    // A missing .env file is normal outside development.
    let _ = dotenvy::dotenv();

    let env = std::env::var("DOCVAULT_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting DocVault v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database (schema migrated on open) ───────────────
    let db = Database::open(&config.database).await?;
    let users = db.user_store();
    let files = db.file_record_store();

    // ── Step 2: Object store + staging area ──────────────────────
    let objects = docvault_storage::build_object_store(&config.storage).await?;
    let staging = StagingArea::new(&config.storage.staging_dir).await?;
    tracing::info!(
        provider = objects.provider_type(),
        staging_dir = %staging.root().display(),
        "Storage initialized"
    );

    // ── Step 3: Auth ─────────────────────────────────────────────
    let hasher = PasswordHasher::new(&config.auth)?;
    let encoder = JwtEncoder::new(&config.auth);
    let gate = AccessGate::new(JwtDecoder::new(&config.auth), users.clone());

    // ── Step 4: Services ─────────────────────────────────────────
    let identity = IdentityService::new(users, hasher, encoder);
    let custody = CustodyPipeline::new(objects, files, config.share.default_recipient.clone());

    // ── Step 5: Build and start HTTP server ──────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let app_state = docvault_api::AppState::new(config, identity, custody, gate, staging);
    let app = docvault_api::build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("DocVault server listening on {}", addr);

    // ── Step 6: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if tokio::time::timeout(grace, db.close()).await.is_err() {
        tracing::warn!("Database pool did not close within the grace period");
    }

    tracing::info!("DocVault server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
