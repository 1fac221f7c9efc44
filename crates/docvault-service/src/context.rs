//! Request context carrying the user resolved by the access gate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docvault_entity::user::User;

/// Context for the current authenticated request.
///
/// Built from the user the access gate resolved and passed into service
/// methods so that every operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The authenticated user's email.
    pub email: String,
    /// The authenticated user's display name.
    pub name: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for a resolved user.
    pub fn for_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            request_time: Utc::now(),
        }
    }
}
