//! Upload: staged file to remote object to index record.

use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use tracing::{error, info, warn};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::{NewObject, ObjectPermission};
use docvault_entity::file::{CreateFileRecord, FileRecord};
use docvault_storage::StagedFile;

use super::pipeline::CustodyPipeline;
use crate::context::RequestContext;

/// Content type every upload is pushed with.
pub const GENERIC_CONTENT_TYPE: &str = "application/octet-stream";

/// Business metadata accompanying an upload.
#[derive(Debug, Clone, Default)]
pub struct UploadParams {
    /// Display name without extension; the original extension is reattached.
    pub file_name: Option<String>,
    /// Document number.
    pub document_number: Option<String>,
    /// Document type.
    pub document_type: Option<String>,
    /// ISO calendar date the document was created.
    pub created_date: Option<String>,
}

/// Result of a completed upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    /// Identifier assigned by the object store.
    pub file_id: String,
    /// Final display name.
    pub file_name: String,
    /// The persisted index record.
    pub record: FileRecord,
}

impl CustodyPipeline {
    /// Pushes a staged file to the object store and records it.
    ///
    /// The staged file is purged whatever the outcome; a purge failure is
    /// logged and never changes the result. If the request is cancelled
    /// mid-flight the file is released when dropped.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        staged: StagedFile,
        params: UploadParams,
    ) -> AppResult<UploadOutcome> {
        let result = self.push_staged(ctx, &staged, params).await;

        if let Err(e) = staged.purge().await {
            warn!(kind = %e.kind, error = %e, "Staged file was not removed");
        }
        result
    }

    async fn push_staged(
        &self,
        ctx: &RequestContext,
        staged: &StagedFile,
        params: UploadParams,
    ) -> AppResult<UploadOutcome> {
        if !staged.exists().await {
            return Err(AppError::missing_input("No file was uploaded"));
        }

        let file_name = display_name(staged, params.file_name.as_deref());
        let created_date = parse_created_date(params.created_date.as_deref())?;
        let (size, content) = staged.open().await?;

        let file_id = self
            .objects
            .create(NewObject {
                name: file_name.clone(),
                mime_type: GENERIC_CONTENT_TYPE.to_string(),
                size,
                content,
            })
            .await
            .map_err(AppError::into_upstream)?;
        info!(user_id = %ctx.user_id, file_id = %file_id, size, "Remote object created");

        self.objects
            .set_permission(&file_id, ObjectPermission::AnyoneReader)
            .await
            .map_err(AppError::into_upstream)?;
        info!(file_id = %file_id, "Public read granted");

        let record = self
            .index
            .create(&CreateFileRecord {
                file_id: file_id.clone(),
                file_name: file_name.clone(),
                document_number: non_blank(params.document_number),
                document_type: non_blank(params.document_type),
                created_date,
                uploaded_by: Some(ctx.user_id),
            })
            .await
            .map_err(|e| {
                error!(
                    file_id = %file_id,
                    consistency = "remote_object_without_record",
                    error = %e,
                    "Remote object created but its record was not written"
                );
                e.into_upstream()
            })?;
        info!(file_id = %file_id, file_name = %file_name, "File record written");

        Ok(UploadOutcome {
            file_id,
            file_name,
            record,
        })
    }
}

/// Final display name: the requested name with the original extension,
/// or the original name when none was requested.
fn display_name(staged: &StagedFile, requested: Option<&str>) -> String {
    match requested.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("{}{}", name, staged.extension()),
        None => staged.original_name().to_string(),
    }
}

/// Parses an ISO calendar date, also accepting a full RFC 3339 timestamp.
fn parse_created_date(raw: Option<&str>) -> AppResult<NaiveDate> {
    let raw = raw
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::missing_input("createdDate is required"))?;

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| AppError::invalid_date(format!("'{raw}' is not a valid date")))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
