//! Opens the Postgres database that backs the identity directory and the
//! metadata index.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use docvault_core::config::DatabaseConfig;
use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;

use crate::repositories::{FileRepository, UserRepository};

/// A migrated Postgres pool, handing out the two stores built on it.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect and bring the `users` and `files` schema up to date.
    ///
    /// An unreachable server is `UpstreamUnavailable`; a schema that cannot
    /// be migrated is a `Configuration` error and stops startup.
    pub async fn open(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::UpstreamUnavailable,
                    "Cannot reach the DocVault database",
                    e,
                )
            })?;

        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("DocVault schema migration failed: {e}"),
                    e,
                )
            })?;

        info!(
            max_connections = config.max_connections,
            "Identity directory and metadata index ready"
        );
        Ok(Self { pool })
    }

    /// Identity directory backed by the `users` table.
    pub fn user_store(&self) -> Arc<UserRepository> {
        Arc::new(UserRepository::new(self.pool.clone()))
    }

    /// Metadata index backed by the `files` table.
    pub fn file_record_store(&self) -> Arc<FileRepository> {
        Arc::new(FileRepository::new(self.pool.clone()))
    }

    /// Wait for checked-out connections to return, then close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
