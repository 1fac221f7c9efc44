//! Store traits for the identity directory and the metadata index.
//!
//! Services depend on these traits rather than on a concrete backend so
//! that the Postgres implementations can be swapped for the in-memory
//! ones in tests.

use async_trait::async_trait;
use uuid::Uuid;

use docvault_core::result::AppResult;
use docvault_entity::file::{CreateFileRecord, FileRecord};
use docvault_entity::user::{CreateUser, User};

/// Owns user records.
///
/// Email lookups are exact matches. Implementations must enforce email
/// uniqueness atomically on `create`, failing with `DuplicateEmail`.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Persist a new user.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;
}

/// Owns file records keyed by remote object identifier.
///
/// Every failure other than a missing record is `UpstreamUnavailable`.
#[async_trait]
pub trait FileRecordStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a new record. Fails if the file id is already present.
    async fn create(&self, data: &CreateFileRecord) -> AppResult<FileRecord>;

    /// Return every record in insertion order.
    async fn find_all(&self) -> AppResult<Vec<FileRecord>>;

    /// Delete a record. Fails with `NotFound` if it does not exist.
    async fn delete_by_file_id(&self, file_id: &str) -> AppResult<()>;
}
