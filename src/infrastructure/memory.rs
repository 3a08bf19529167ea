use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::User;
use crate::infrastructure::user_store::{UserStore, UserStoreError};

/// Map-backed store for tests and local runs without a database. The
/// `emails` index is the uniqueness guard: claiming an email goes through
/// its entry lock, so two concurrent inserts of the same address cannot
/// both succeed.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: DashMap<Uuid, User>,
    emails: DashMap<String, Uuid>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: &User) -> Result<(), UserStoreError> {
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(UserStoreError::EmailExists(user.email.clone())),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
                self.users.insert(user.id, user.clone());
                Ok(())
            }
        }
    }

    async fn update(&self, user: &User) -> Result<(), UserStoreError> {
        let previous_email = match self.users.get(&user.id) {
            Some(existing) => existing.email.clone(),
            None => return Err(UserStoreError::NotFound(user.id)),
        };

        if previous_email != user.email {
            match self.emails.entry(user.email.clone()) {
                Entry::Occupied(slot) if *slot.get() != user.id => {
                    return Err(UserStoreError::EmailExists(user.email.clone()));
                }
                Entry::Occupied(_) => {}
                Entry::Vacant(slot) => {
                    slot.insert(user.id);
                }
            }
            self.emails.remove(&previous_email);
        }

        self.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserStoreError> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        let id = match self.emails.get(email) {
            Some(id) => *id.value(),
            None => return Ok(None),
        };
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_all(&self) -> Result<Vec<User>, UserStoreError> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.value().clone()).collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn delete_all(&self) -> Result<u64, UserStoreError> {
        let removed = self.users.len() as u64;
        self.users.clear();
        self.emails.clear();
        Ok(removed)
    }
}
