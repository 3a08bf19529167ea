use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::{NewUser, User, UserError, UserUpdate};
use crate::infrastructure::auth::hash_password;
use crate::infrastructure::user_store::UserStore;

/// Business rules over the account store: duplicate prevention, secret
/// hashing, full-record updates.
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Create an account. The email must be unused; the submitted password
    /// is hashed before it reaches the store. The pre-check gives the
    /// common case a clean error, the store's unique constraint covers the
    /// race.
    pub async fn register(&self, new_user: NewUser) -> Result<User, UserError> {
        if self.store.find_by_email(&new_user.email).await?.is_some() {
            return Err(UserError::EmailExists(new_user.email));
        }

        let password_hash =
            hash_password(&new_user.password).map_err(|e| UserError::PasswordHash(e.to_string()))?;
        let user = User::new(new_user.name, new_user.email, password_hash, new_user.photo);

        self.store.insert(&user).await?;
        info!(user_id = %user.id, "registered account");
        Ok(user)
    }

    /// Replace an existing account's fields. Moving to an email owned by a
    /// different account is a duplicate; the password is re-hashed on every
    /// update.
    pub async fn update(&self, update: UserUpdate) -> Result<User, UserError> {
        let mut user = self
            .store
            .find_by_id(update.id)
            .await?
            .ok_or(UserError::NotFound)?;

        if update.email != user.email {
            if let Some(existing) = self.store.find_by_email(&update.email).await? {
                if existing.id != update.id {
                    return Err(UserError::EmailExists(update.email));
                }
            }
        }

        user.name = update.name;
        user.email = update.email;
        user.password_hash =
            hash_password(&update.password).map_err(|e| UserError::PasswordHash(e.to_string()))?;
        user.photo = update.photo;
        user.updated_at = Utc::now();

        self.store.update(&user).await?;
        info!(user_id = %user.id, "updated account");
        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<User>, UserError> {
        Ok(self.store.find_all().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<User, UserError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound)
    }
}
