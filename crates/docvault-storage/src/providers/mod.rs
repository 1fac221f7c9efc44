//! Object store provider implementations.

#[cfg(feature = "drive")]
pub mod drive;
pub mod memory;

use std::sync::Arc;

use tracing::info;

use docvault_core::config::StorageConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::ObjectStore;

#[cfg(feature = "drive")]
pub use drive::DriveObjectStore;
pub use memory::MemoryObjectStore;

/// Build the object store selected by `storage.provider`.
///
/// The store is constructed once at startup and injected into the
/// custody pipeline for the lifetime of the process.
pub async fn build_object_store(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    info!(provider = %config.provider, "Initializing object store");

    match config.provider.as_str() {
        #[cfg(feature = "drive")]
        "drive" => Ok(Arc::new(DriveObjectStore::new(&config.drive)?)),
        "memory" => Ok(Arc::new(MemoryObjectStore::new())),
        other => Err(AppError::configuration(format!(
            "Unsupported object store provider '{other}'"
        ))),
    }
}
