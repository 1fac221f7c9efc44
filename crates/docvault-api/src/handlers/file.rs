//! File handlers: upload, list, download, preview, share, delete.

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use docvault_core::error::AppError;
use docvault_entity::file::FileRecord;
use docvault_service::{FetchMode, FetchResult, UploadParams};
use docvault_storage::StagedFile;

use crate::dto::request::{ShareRequest, UploadForm};
use crate::dto::response::{AckResponse, UploadResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/files/upload
///
/// The `file` part is staged to disk as soon as it is read; the text
/// parts may come before or after it.
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let mut staged: Option<StagedFile> = None;
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            let original_name = field
                .file_name()
                .filter(|n| !n.is_empty())
                .unwrap_or("upload")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
            staged = Some(state.staging.stage(&original_name, data).await?);
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
            form.set(&name, value);
        }
    }

    let staged = staged.ok_or_else(|| AppError::missing_input("No file was uploaded"))?;
    let params = UploadParams {
        file_name: form.file_name,
        document_number: form.doc_number,
        document_type: form.doc_type,
        created_date: form.created_date,
    };

    let outcome = state.custody.upload(auth.context(), staged, params).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            success: true,
            message: format!("File '{}' successfully uploaded", outcome.file_name),
            file_id: outcome.file_id,
            file_name: outcome.file_name,
        }),
    ))
}

/// GET /api/files
pub async fn list_files(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<FileRecord>>> {
    Ok(Json(state.custody.list_all().await?))
}

/// GET /api/files/{id}
pub async fn download_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let result = state
        .custody
        .fetch(auth.context(), &id, FetchMode::Download)
        .await?;
    Ok(stream_response(result)?)
}

/// GET /api/files/{id}/preview
pub async fn preview_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let result = state
        .custody
        .fetch(auth.context(), &id, FetchMode::Preview)
        .await?;
    Ok(stream_response(result)?)
}

/// POST /api/files/{id}/share
///
/// The body is optional; without an email the configured default
/// recipient is used.
pub async fn share_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<AckResponse>> {
    let req: ShareRequest = if body.is_empty() {
        ShareRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::validation(format!("Invalid share request: {e}")))?
    };

    let recipient = state
        .custody
        .share(auth.context(), &id, req.email.as_deref())
        .await?;

    Ok(Json(AckResponse::ok(format!(
        "File shared with {recipient}"
    ))))
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<AckResponse>> {
    state.custody.delete(auth.context(), &id).await?;
    Ok(Json(AckResponse::ok(format!(
        "File with ID {id} deleted successfully"
    ))))
}

fn stream_response(result: FetchResult) -> Result<Response, AppError> {
    let content_type = HeaderValue::from_str(&result.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = content_disposition(result.disposition.as_str(), &result.file_name)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(result.stream),
    )
        .into_response())
}

fn content_disposition(kind: &str, file_name: &str) -> Result<HeaderValue, AppError> {
    let safe: String = file_name
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    HeaderValue::from_bytes(format!("{kind}; filename=\"{safe}\"").as_bytes())
        .map_err(|e| AppError::internal(format!("Invalid Content-Disposition: {e}")))
}
