//! Fetch: stream a remote object for download or preview.

use tracing::info;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::ByteStream;

use super::pipeline::CustodyPipeline;
use super::upload::GENERIC_CONTENT_TYPE;
use crate::context::RequestContext;

/// How the caller wants to present the fetched bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// An opaque attachment.
    Download,
    /// Inline, with the remote content type.
    Preview,
}

/// Presentation hint for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Save as a file.
    Attachment,
    /// Display in place.
    Inline,
}

impl Disposition {
    /// The `Content-Disposition` type token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attachment => "attachment",
            Self::Inline => "inline",
        }
    }
}

/// A remote object opened for reading.
pub struct FetchResult {
    /// Name reported by the object store.
    pub file_name: String,
    /// Content type the caller should present.
    pub content_type: String,
    /// Presentation hint.
    pub disposition: Disposition,
    /// Object contents.
    pub stream: ByteStream,
}

impl std::fmt::Debug for FetchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchResult")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("disposition", &self.disposition)
            .finish()
    }
}

impl CustodyPipeline {
    /// Opens a remote object. Name and content type come from the object
    /// store, not from the index; the bytes are the same in both modes.
    pub async fn fetch(
        &self,
        ctx: &RequestContext,
        file_id: &str,
        mode: FetchMode,
    ) -> AppResult<FetchResult> {
        let meta = self
            .objects
            .metadata(file_id)
            .await
            .map_err(AppError::into_upstream)?;
        let stream = self
            .objects
            .read(file_id)
            .await
            .map_err(AppError::into_upstream)?;

        let (content_type, disposition) = match mode {
            FetchMode::Download => (GENERIC_CONTENT_TYPE.to_string(), Disposition::Attachment),
            FetchMode::Preview if meta.mime_type.is_empty() => {
                (GENERIC_CONTENT_TYPE.to_string(), Disposition::Inline)
            }
            FetchMode::Preview => (meta.mime_type, Disposition::Inline),
        };

        info!(user_id = %ctx.user_id, file_id, ?mode, "File fetched");
        Ok(FetchResult {
            file_name: meta.name,
            content_type,
            disposition,
            stream,
        })
    }
}
