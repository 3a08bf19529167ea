use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{User, UserError};

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("user not found for id: {0}")]
    NotFound(Uuid),
    #[error("email '{0}' already exists")]
    EmailExists(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence contract for accounts. `delete_all` exists for fixture reset
/// and is never routed over HTTP.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), UserStoreError>;
    async fn update(&self, user: &User) -> Result<(), UserStoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserStoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError>;
    async fn find_all(&self) -> Result<Vec<User>, UserStoreError>;
    async fn delete_all(&self) -> Result<u64, UserStoreError>;
}

impl From<UserStoreError> for UserError {
    fn from(err: UserStoreError) -> Self {
        match err {
            UserStoreError::NotFound(_) => UserError::NotFound,
            UserStoreError::EmailExists(email) => UserError::EmailExists(email),
            UserStoreError::Database(e) => UserError::Storage(e.to_string()),
        }
    }
}
