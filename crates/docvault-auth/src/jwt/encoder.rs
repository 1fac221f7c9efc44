//! Bearer token creation.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use docvault_core::config::AuthConfig;
use docvault_core::error::AppError;

use super::claims::Claims;

/// Creates HS256-signed bearer tokens with a fixed TTL.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Token TTL in minutes.
    ttl_minutes: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_minutes: config.jwt_ttl_minutes as i64,
        }
    }

    /// Builds the claims for a user issued at `now`.
    pub fn claims_for(&self, user_id: Uuid, email: &str, now: DateTime<Utc>) -> Claims {
        Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::minutes(self.ttl_minutes)).timestamp(),
        }
    }

    /// Signs the given claims.
    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }

    /// Issues a token for a user, valid from now until the configured TTL elapses.
    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<String, AppError> {
        self.encode(&self.claims_for(user_id, email, Utc::now()))
    }
}
