//! Identity directory operations: registration and authentication.

use std::sync::Arc;

use tracing::{info, warn};

use docvault_auth::jwt::JwtEncoder;
use docvault_auth::password::PasswordHasher;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_database::UserStore;
use docvault_entity::user::{CreateUser, User};

/// A successful login.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    /// The authenticated user.
    pub user: User,
    /// Bearer token issued for the user.
    pub token: String,
}

/// Owns user registration and credential checks.
#[derive(Debug, Clone)]
pub struct IdentityService {
    /// Identity directory.
    users: Arc<dyn UserStore>,
    /// Credential hasher.
    hasher: PasswordHasher,
    /// Token issuer.
    encoder: JwtEncoder,
}

impl IdentityService {
    /// Creates a new identity service.
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher, encoder: JwtEncoder) -> Self {
        Self {
            users,
            hasher,
            encoder,
        }
    }

    /// Registers a new user.
    ///
    /// Email comparison is exact. The store's unique constraint backs up
    /// the pre-check when two registrations race.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AppResult<User> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::duplicate_email(format!(
                "User with email '{email}' already exists"
            )));
        }

        let password_hash = self.hash(password).await?;
        let user = self
            .users
            .create(&CreateUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Verifies credentials and issues a bearer token.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<AuthOutcome> {
        let Some(user) = self.users.find_by_email(email).await? else {
            warn!("Login attempt for unknown email");
            return Err(AppError::invalid_credentials("Invalid email or password"));
        };

        if !self.verify(password, &user.password_hash).await? {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AppError::invalid_credentials("Invalid email or password"));
        }

        let token = self.encoder.issue(user.id, &user.email)?;
        info!(user_id = %user.id, "User logged in");
        Ok(AuthOutcome { user, token })
    }

    async fn hash(&self, password: &str) -> AppResult<String> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| AppError::internal(format!("Hashing task failed: {e}")))?
    }

    async fn verify(&self, password: &str, digest: &str) -> AppResult<bool> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let digest = digest.to_string();
        tokio::task::spawn_blocking(move || hasher.verify_password(&password, &digest))
            .await
            .map_err(|e| AppError::internal(format!("Verification task failed: {e}")))?
    }
}
