//! File record entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Business metadata for a document held in the object store.
///
/// The primary key is the identifier the object store assigned on
/// creation. A record only exists once its remote object does.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Remote object identifier.
    pub file_id: String,
    /// Display file name, extension included.
    pub file_name: String,
    /// Document number.
    pub document_number: Option<String>,
    /// Document type.
    pub document_type: Option<String>,
    /// Calendar date the document was created.
    pub created_date: NaiveDate,
    /// The user who uploaded the file.
    pub uploaded_by: Option<Uuid>,
    /// Insertion timestamp; defines listing order.
    pub uploaded_at: DateTime<Utc>,
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFileRecord {
    /// Remote object identifier.
    pub file_id: String,
    /// Display file name.
    pub file_name: String,
    /// Document number.
    pub document_number: Option<String>,
    /// Document type.
    pub document_type: Option<String>,
    /// Calendar date the document was created.
    pub created_date: NaiveDate,
    /// The uploading user.
    pub uploaded_by: Option<Uuid>,
}
