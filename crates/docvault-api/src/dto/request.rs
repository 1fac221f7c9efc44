//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name.
    #[serde(alias = "nama")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Email address.
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Share request body. The recipient may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareRequest {
    /// Recipient email.
    #[serde(default)]
    pub email: Option<String>,
}

/// Text fields of the multipart upload form.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    /// Requested display name, without extension.
    pub file_name: Option<String>,
    /// Document number.
    pub doc_number: Option<String>,
    /// Document type.
    pub doc_type: Option<String>,
    /// ISO creation date.
    pub created_date: Option<String>,
}

impl UploadForm {
    /// Records a text field by its form name. Unknown names are ignored.
    pub fn set(&mut self, field: &str, value: String) {
        let slot = match field {
            "fileName" => &mut self.file_name,
            "docNumber" | "nomorSurat" => &mut self.doc_number,
            "docType" | "jenisSurat" => &mut self.doc_type,
            "createdDate" | "tanggalDibuat" => &mut self.created_date,
            _ => return,
        };
        *slot = Some(value);
    }
}
