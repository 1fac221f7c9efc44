//! In-memory metadata index.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_entity::file::{CreateFileRecord, FileRecord};

use crate::store::FileRecordStore;

/// Metadata index held in an insertion-ordered vector.
#[derive(Debug, Default)]
pub struct MemoryFileRecordStore {
    records: RwLock<Vec<FileRecord>>,
}

impl MemoryFileRecordStore {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileRecordStore for MemoryFileRecordStore {
    async fn create(&self, data: &CreateFileRecord) -> AppResult<FileRecord> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.file_id == data.file_id) {
            return Err(AppError::upstream(format!(
                "File record '{}' already exists",
                data.file_id
            )));
        }

        let record = FileRecord {
            file_id: data.file_id.clone(),
            file_name: data.file_name.clone(),
            document_number: data.document_number.clone(),
            document_type: data.document_type.clone(),
            created_date: data.created_date,
            uploaded_by: data.uploaded_by,
            uploaded_at: Utc::now(),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn find_all(&self) -> AppResult<Vec<FileRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn delete_by_file_id(&self, file_id: &str) -> AppResult<()> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.file_id != file_id);
        if records.len() == before {
            return Err(AppError::not_found(format!(
                "File record '{file_id}' not found"
            )));
        }
        Ok(())
    }
}
