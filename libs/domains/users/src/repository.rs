use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{User, UserFilter};

/// Repository trait for User persistence
///
/// Emails are stored normalized; lookups expect a normalized email too.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `DuplicateEmail` if the email is taken.
    async fn create(&self, user: User) -> UserResult<User>;

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// Users with any of the given ids, in no particular order
    async fn get_many(&self, ids: Vec<Uuid>) -> UserResult<Vec<User>>;

    /// Filtered and sorted list
    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>>;

    async fn update_password(&self, id: Uuid, password_hash: String) -> UserResult<()>;

    async fn count(&self) -> UserResult<u64>;
}

/// In-memory implementation of UserRepository (for development/testing)
///
/// Clones share the same storage.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, role = %user.role, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn get_many(&self, ids: Vec<Uuid>) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users
            .values()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect();
        result.sort_by(|a, b| filter.compare(a, b).then_with(|| a.id.cmp(&b.id)));

        Ok(result)
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> UserResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(UserError::NotFound(id))?;

        user.password_hash = password_hash;
        user.updated_at = chrono::Utc::now();

        tracing::info!(user_id = %id, "Updated password");
        Ok(())
    }

    async fn count(&self) -> UserResult<u64> {
        Ok(self.users.read().await.len() as u64)
    }
}
