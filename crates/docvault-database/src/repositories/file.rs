//! File record repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_entity::file::{CreateFileRecord, FileRecord};

use crate::store::FileRecordStore;

/// Postgres-backed metadata index.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRecordStore for FileRepository {
    async fn create(&self, data: &CreateFileRecord) -> AppResult<FileRecord> {
        sqlx::query_as::<_, FileRecord>(
            "INSERT INTO files (file_id, file_name, document_number, document_type, created_date, uploaded_by) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(&data.file_id)
        .bind(&data.file_name)
        .bind(&data.document_number)
        .bind(&data.document_type)
        .bind(data.created_date)
        .bind(data.uploaded_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("files_pkey") => {
                AppError::upstream(format!("File record '{}' already exists", data.file_id))
            }
            _ => AppError::with_source(
                ErrorKind::UpstreamUnavailable,
                "Failed to create file record",
                e,
            ),
        })
    }

    async fn find_all(&self) -> AppResult<Vec<FileRecord>> {
        sqlx::query_as::<_, FileRecord>("SELECT * FROM files ORDER BY uploaded_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::UpstreamUnavailable, "Failed to list file records", e)
            })
    }

    async fn delete_by_file_id(&self, file_id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM files WHERE file_id = $1")
            .bind(file_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::UpstreamUnavailable,
                    "Failed to delete file record",
                    e,
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "File record '{file_id}' not found"
            )));
        }
        Ok(())
    }
}
