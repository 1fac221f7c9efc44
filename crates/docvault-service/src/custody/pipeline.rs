//! The custody pipeline and its list, share and delete operations.

use std::sync::Arc;

use tracing::{error, info, warn};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::{ObjectPermission, ObjectStore};
use docvault_database::FileRecordStore;
use docvault_entity::file::FileRecord;

use crate::context::RequestContext;

/// Orchestrates the object store and the metadata index.
#[derive(Debug, Clone)]
pub struct CustodyPipeline {
    /// Remote object store.
    pub(crate) objects: Arc<dyn ObjectStore>,
    /// Metadata index.
    pub(crate) index: Arc<dyn FileRecordStore>,
    /// Recipient for share requests that name nobody.
    default_recipient: Option<String>,
}

impl CustodyPipeline {
    /// Creates a new pipeline.
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        index: Arc<dyn FileRecordStore>,
        default_recipient: Option<String>,
    ) -> Self {
        Self {
            objects,
            index,
            default_recipient: default_recipient.filter(|r| !r.trim().is_empty()),
        }
    }

    /// Every file record, in insertion order, regardless of uploader.
    pub async fn list_all(&self) -> AppResult<Vec<FileRecord>> {
        self.index.find_all().await.map_err(AppError::into_upstream)
    }

    /// Grants read access on a remote object to one principal.
    ///
    /// Falls back to the configured default recipient when `email` is
    /// absent or blank.
    pub async fn share(
        &self,
        ctx: &RequestContext,
        file_id: &str,
        email: Option<&str>,
    ) -> AppResult<String> {
        let recipient = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .or_else(|| self.default_recipient.clone())
            .ok_or_else(|| AppError::missing_input("A recipient email is required"))?;

        self.objects
            .set_permission(
                file_id,
                ObjectPermission::UserReader {
                    email: recipient.clone(),
                },
            )
            .await
            .map_err(AppError::into_upstream)?;

        info!(user_id = %ctx.user_id, file_id, recipient = %recipient, "File shared");
        Ok(recipient)
    }

    /// Deletes the remote object, then its record.
    ///
    /// If the remote delete fails the record is left untouched.
    pub async fn delete(&self, ctx: &RequestContext, file_id: &str) -> AppResult<()> {
        self.objects
            .delete(file_id)
            .await
            .map_err(AppError::into_upstream)?;
        info!(user_id = %ctx.user_id, file_id, "Remote object deleted");

        if let Err(e) = self.index.delete_by_file_id(file_id).await {
            if e.is_not_found() {
                warn!(file_id, "Remote object deleted but no record was indexed");
            } else {
                error!(
                    file_id,
                    consistency = "record_without_remote_object",
                    error = %e,
                    "File record not removed after remote delete"
                );
            }
            return Err(e.into_upstream());
        }

        info!(user_id = %ctx.user_id, file_id, "File record deleted");
        Ok(())
    }
}
