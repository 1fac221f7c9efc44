//! Response DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docvault_entity::user::User;

/// Public view of a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Registration response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Outcome message.
    pub message: String,
    /// The new user.
    pub data: UserResponse,
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Outcome message.
    pub message: String,
    /// Bearer token.
    pub token: String,
    /// The authenticated user.
    pub data: UserResponse,
}

/// Upload response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Always `true`.
    pub success: bool,
    /// Identifier assigned by the object store.
    pub file_id: String,
    /// Final display name.
    pub file_name: String,
    /// Outcome message.
    pub message: String,
}

/// Acknowledgement for share and delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    /// Always `true`.
    pub success: bool,
    /// Outcome message.
    pub message: String,
}

impl AckResponse {
    /// A successful acknowledgement.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` when serving.
    pub status: String,
    /// Crate version.
    pub version: String,
}
