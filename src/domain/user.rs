use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// A registered account. The email doubles as the login identifier and is
/// unique across the store; the password is only ever held in hashed form.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration input, before an id exists and before the password is hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub photo: Option<String>,
}

/// Full replacement of an existing account's mutable fields.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub photo: Option<String>,
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("email '{0}' is already registered")]
    EmailExists(String),
    #[error("user not found")]
    NotFound,
    #[error("id must not be set when registering")]
    IdNotAllowed,
    #[error("{0}")]
    Validation(String),
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl User {
    pub fn new(name: String, email: String, password_hash: String, photo: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            photo,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_gets_a_fresh_id() {
        let a = User::new("Ana".into(), "ana@email.com".into(), "hash".into(), None);
        let b = User::new("Ana".into(), "ana@email.com".into(), "hash".into(), None);

        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
    }
}
