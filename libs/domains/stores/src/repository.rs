use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::{Rating, Store, StoreFilter, average_rating};

/// Repository trait for stores and their ratings
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn create(&self, store: Store) -> StoreResult<Store>;

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Store>>;

    /// Filtered and sorted list
    async fn list(&self, filter: StoreFilter) -> StoreResult<Vec<Store>>;

    /// Point the store at a new owner. Fails with `StoreNotFound`.
    async fn set_owner(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Store>;

    /// Earliest created store owned by `owner_id`
    async fn first_owned_by(&self, owner_id: Uuid) -> StoreResult<Option<Store>>;

    /// Insert or replace the `(user_id, store_id)` rating and recompute the
    /// store's cached average, as a single unit of work.
    ///
    /// Fails with `StoreNotFound` and leaves nothing behind if the store is
    /// missing.
    async fn upsert_rating(&self, user_id: Uuid, store_id: Uuid, value: i32)
    -> StoreResult<Rating>;

    async fn ratings_for_store(&self, store_id: Uuid) -> StoreResult<Vec<Rating>>;

    async fn ratings_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Rating>>;

    async fn count(&self) -> StoreResult<u64>;

    async fn count_ratings(&self) -> StoreResult<u64>;
}

#[derive(Debug, Default)]
struct Tables {
    stores: HashMap<Uuid, Store>,
    ratings: HashMap<(Uuid, Uuid), Rating>,
}

/// In-memory implementation of StoreRepository (for development/testing)
///
/// Stores and ratings sit behind one lock, so a rating write and the
/// average recompute are never observed apart.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStoreRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStoreRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreRepository for InMemoryStoreRepository {
    async fn create(&self, store: Store) -> StoreResult<Store> {
        let mut tables = self.tables.write().await;
        tables.stores.insert(store.id, store.clone());

        tracing::info!(store_id = %store.id, "Created store");
        Ok(store)
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Store>> {
        let tables = self.tables.read().await;
        Ok(tables.stores.get(&id).cloned())
    }

    async fn list(&self, filter: StoreFilter) -> StoreResult<Vec<Store>> {
        let tables = self.tables.read().await;

        let mut result: Vec<Store> = tables
            .stores
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        result.sort_by(|a, b| filter.compare(a, b).then_with(|| a.id.cmp(&b.id)));

        Ok(result)
    }

    async fn set_owner(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Store> {
        let mut tables = self.tables.write().await;
        let store = tables
            .stores
            .get_mut(&id)
            .ok_or(StoreError::StoreNotFound(id))?;

        store.owner_id = Some(owner_id);
        store.updated_at = Utc::now();

        tracing::info!(store_id = %id, owner_id = %owner_id, "Assigned store owner");
        Ok(store.clone())
    }

    async fn first_owned_by(&self, owner_id: Uuid) -> StoreResult<Option<Store>> {
        let tables = self.tables.read().await;
        Ok(tables
            .stores
            .values()
            .filter(|s| s.owner_id == Some(owner_id))
            .min_by_key(|s| (s.created_at, s.id))
            .cloned())
    }

    async fn upsert_rating(
        &self,
        user_id: Uuid,
        store_id: Uuid,
        value: i32,
    ) -> StoreResult<Rating> {
        let mut tables = self.tables.write().await;
        if !tables.stores.contains_key(&store_id) {
            return Err(StoreError::StoreNotFound(store_id));
        }

        let now = Utc::now();
        let rating = tables
            .ratings
            .entry((user_id, store_id))
            .and_modify(|r| {
                r.value = value;
                r.updated_at = now;
            })
            .or_insert_with(|| Rating {
                id: Uuid::now_v7(),
                user_id,
                store_id,
                value,
                created_at: now,
                updated_at: now,
            })
            .clone();

        let values: Vec<i32> = tables
            .ratings
            .values()
            .filter(|r| r.store_id == store_id)
            .map(|r| r.value)
            .collect();
        let average = average_rating(&values);

        if let Some(store) = tables.stores.get_mut(&store_id) {
            store.rating = average;
            store.updated_at = now;
        }

        tracing::info!(
            user_id = %user_id,
            store_id = %store_id,
            value,
            average = %average,
            "Recorded rating"
        );
        Ok(rating)
    }

    async fn ratings_for_store(&self, store_id: Uuid) -> StoreResult<Vec<Rating>> {
        let tables = self.tables.read().await;
        Ok(tables
            .ratings
            .values()
            .filter(|r| r.store_id == store_id)
            .cloned()
            .collect())
    }

    async fn ratings_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Rating>> {
        let tables = self.tables.read().await;
        Ok(tables
            .ratings
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.tables.read().await.stores.len() as u64)
    }

    async fn count_ratings(&self) -> StoreResult<u64> {
        Ok(self.tables.read().await.ratings.len() as u64)
    }
}
