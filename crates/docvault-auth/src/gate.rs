//! Access gate in front of every custody operation.

use std::sync::Arc;

use tracing::debug;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_database::UserStore;
use docvault_entity::user::User;

use crate::jwt::JwtDecoder;

/// Resolves a bearer token to a live user.
///
/// Validation is stateless: every call verifies the signature and then
/// looks the user up again, so removing a user invalidates all of their
/// outstanding tokens. Nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct AccessGate {
    decoder: JwtDecoder,
    users: Arc<dyn UserStore>,
}

impl AccessGate {
    /// Creates a new gate.
    pub fn new(decoder: JwtDecoder, users: Arc<dyn UserStore>) -> Self {
        Self { decoder, users }
    }

    /// Authorizes a request carrying `token`, if any.
    pub async fn authorize(&self, token: Option<&str>) -> AppResult<User> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthorized("Missing bearer token"))?;

        let claims = self.decoder.validate(token)?;

        let user = self
            .users
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| AppError::unauthorized("User no longer exists"))?;

        debug!(user_id = %user.id, "Bearer token accepted");
        Ok(user)
    }
}
