//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use docvault_auth::AccessGate;
use docvault_core::config::AppConfig;
use docvault_service::{CustodyPipeline, IdentityService};
use docvault_storage::StagingArea;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Registration and login
    pub identity: Arc<IdentityService>,
    /// File custody pipeline
    pub custody: Arc<CustodyPipeline>,
    /// Bearer token gate for custody routes
    pub gate: Arc<AccessGate>,
    /// Where uploads land before the pipeline runs
    pub staging: Arc<StagingArea>,
}

impl AppState {
    /// Assembles the state from its parts.
    pub fn new(
        config: AppConfig,
        identity: IdentityService,
        custody: CustodyPipeline,
        gate: AccessGate,
        staging: StagingArea,
    ) -> Self {
        Self {
            config: Arc::new(config),
            identity: Arc::new(identity),
            custody: Arc::new(custody),
            gate: Arc::new(gate),
            staging: Arc::new(staging),
        }
    }
}
