use crate::domain::repository::UserRepository;
use crate::domain::user::{Role, User};
use crate::domain::validation::normalize_email;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

#[derive(Clone)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id, email = %user.email))]
    async fn save_user(&self, user: User) -> Result<()> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        debug!(
            user_id = %user.id,
            verified = user.is_email_verified,
            "User saved to memory storage"
        );
        storage.insert(user.id.clone(), user);
        Ok(())
    }

    #[instrument(skip(self), fields(email = email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = normalize_email(email);
        let storage = self.storage.read().await;
        let user = storage
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(&email))
            .cloned();
        match &user {
            Some(u) => debug!(user_id = %u.id, "User found in storage"),
            None => trace!("User not found in storage"),
        }
        Ok(user)
    }

    #[instrument(skip(self), fields(email = email, role = %role))]
    async fn find_user_by_email_and_role(&self, email: &str, role: Role) -> Result<Option<User>> {
        let email = normalize_email(email);
        let storage = self.storage.read().await;
        let user = storage
            .values()
            .find(|u| u.role == role && u.email.eq_ignore_ascii_case(&email))
            .cloned();
        if user.is_none() {
            trace!("No user with this email and role");
        }
        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = id))]
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let storage = self.storage.read().await;
        let user = storage.get(id).cloned();
        if user.is_none() {
            trace!(user_id = id, "User not found in storage");
        }
        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = id))]
    async fn delete_user(&self, id: &str) -> Result<bool> {
        let mut storage = self.storage.write().await;
        let removed = storage.remove(id).is_some();
        debug!(user_id = id, removed, "Delete user from memory storage");
        Ok(removed)
    }
}
