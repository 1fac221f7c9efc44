//! In-memory identity directory.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_entity::user::{CreateUser, User};

use crate::store::UserStore;

/// Identity directory held in concurrent maps.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    /// Users keyed by id.
    users: DashMap<Uuid, User>,
    /// Email to user id; the entry lock makes uniqueness atomic.
    emails: DashMap<String, Uuid>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a user, as an operator acting outside the core would.
    pub fn remove(&self, id: Uuid) -> Option<User> {
        let (_, user) = self.users.remove(&id)?;
        self.emails.remove(&user.email);
        Some(user)
    }

    /// Number of registered users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no user is registered.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let Some(id) = self.emails.get(email).map(|e| *e.value()) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        match self.emails.entry(data.email.clone()) {
            Entry::Occupied(_) => Err(AppError::duplicate_email("Email is already registered")),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let user = User {
                    id: Uuid::new_v4(),
                    name: data.name.clone(),
                    email: data.email.clone(),
                    password_hash: data.password_hash.clone(),
                    created_at: now,
                    updated_at: now,
                };
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(user)
            }
        }
    }
}
