use domain_users::validation::normalize_email;
use domain_users::{Role, UserRepository};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::{
    AdminStoreResponse, AssignOwnerRequest, AssignOwnerResponse, BrowseStoresQuery,
    CreateStoreRequest, DashboardStats, MAX_RATING, MIN_RATING, OwnerDashboard, OwnerSummary,
    Rater, Store, StoreFilter, SubmitRatingRequest, SubmitRatingResponse, UserDetails,
    UserStoreView,
};
use crate::repository::StoreRepository;

/// Service layer for stores, ratings and the dashboards built on them
///
/// User records are read through `UserRepository`; this service never
/// writes them.
pub struct StoreService<S: StoreRepository, U: UserRepository> {
    stores: Arc<S>,
    users: Arc<U>,
}

impl<S: StoreRepository, U: UserRepository> Clone for StoreService<S, U> {
    fn clone(&self) -> Self {
        Self {
            stores: Arc::clone(&self.stores),
            users: Arc::clone(&self.users),
        }
    }
}

impl<S: StoreRepository, U: UserRepository> StoreService<S, U> {
    pub fn new(stores: S, users: U) -> Self {
        Self {
            stores: Arc::new(stores),
            users: Arc::new(users),
        }
    }

    pub async fn create_store(&self, input: CreateStoreRequest) -> StoreResult<Store> {
        let store = Store::new(input.name, normalize_email(&input.email), input.address);
        self.stores.create(store).await
    }

    /// The store is checked first, so a missing store wins over a bad owner.
    pub async fn assign_owner(
        &self,
        store_id: Uuid,
        input: AssignOwnerRequest,
    ) -> StoreResult<AssignOwnerResponse> {
        self.stores
            .get_by_id(store_id)
            .await?
            .ok_or(StoreError::StoreNotFound(store_id))?;

        let owner_id = input.owner_id.ok_or(StoreError::InvalidOwner)?;
        let owner = self.users.get_by_id(owner_id).await?;
        if !owner.is_some_and(|u| u.role == Role::StoreOwner) {
            tracing::info!(store_id = %store_id, owner_id = %owner_id, "Owner assignment rejected");
            return Err(StoreError::InvalidOwner);
        }

        let store = self.stores.set_owner(store_id, owner_id).await?;
        Ok(AssignOwnerResponse {
            message: "Owner assigned".to_string(),
            store,
        })
    }

    pub async fn list_stores(&self, filter: StoreFilter) -> StoreResult<Vec<AdminStoreResponse>> {
        let stores = self.stores.list(filter).await?;

        let mut owner_ids: Vec<Uuid> = stores.iter().filter_map(|s| s.owner_id).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();

        let owners: HashMap<Uuid, OwnerSummary> = self
            .users
            .get_many(owner_ids)
            .await?
            .into_iter()
            .map(|u| {
                (
                    u.id,
                    OwnerSummary {
                        name: u.name,
                        email: u.email,
                    },
                )
            })
            .collect();

        Ok(stores
            .into_iter()
            .map(|store| {
                let owner = store.owner_id.and_then(|id| owners.get(&id).cloned());
                AdminStoreResponse::new(store, owner)
            })
            .collect())
    }

    pub async fn dashboard_stats(&self) -> StoreResult<DashboardStats> {
        let (total_users, total_stores, total_ratings) = tokio::try_join!(
            async { self.users.count().await.map_err(StoreError::from) },
            self.stores.count(),
            self.stores.count_ratings(),
        )?;

        Ok(DashboardStats {
            total_users,
            total_stores,
            total_ratings,
        })
    }

    /// Stores visible to any signed-in user, with the caller's own rating.
    pub async fn browse(
        &self,
        caller_id: Uuid,
        query: BrowseStoresQuery,
    ) -> StoreResult<Vec<UserStoreView>> {
        let (stores, own) = tokio::try_join!(
            self.stores.list(query.into()),
            self.stores.ratings_by_user(caller_id),
        )?;
        let own: HashMap<Uuid, i32> = own.into_iter().map(|r| (r.store_id, r.value)).collect();

        Ok(stores
            .into_iter()
            .map(|s| UserStoreView {
                user_rating: own.get(&s.id).copied(),
                id: s.id,
                name: s.name,
                address: s.address,
                rating: s.rating,
            })
            .collect())
    }

    pub async fn submit_rating(
        &self,
        caller_id: Uuid,
        input: SubmitRatingRequest,
    ) -> StoreResult<SubmitRatingResponse> {
        if !(MIN_RATING..=MAX_RATING).contains(&input.rating) {
            return Err(StoreError::InvalidRating(input.rating));
        }

        let rating = self
            .stores
            .upsert_rating(caller_id, input.store_id, input.rating)
            .await?;

        Ok(SubmitRatingResponse {
            message: "Rating submitted".to_string(),
            rating: rating.value,
        })
    }

    /// Dashboard for the earliest created store owned by the caller.
    pub async fn owner_dashboard(&self, caller_id: Uuid) -> StoreResult<OwnerDashboard> {
        let store = self
            .stores
            .first_owned_by(caller_id)
            .await?
            .ok_or(StoreError::NoOwnedStore(caller_id))?;

        let ratings = self.stores.ratings_for_store(store.id).await?;
        let raters_by_id: HashMap<Uuid, _> = self
            .users
            .get_many(ratings.iter().map(|r| r.user_id).collect())
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut raters: Vec<Rater> = ratings
            .iter()
            .filter_map(|r| {
                raters_by_id.get(&r.user_id).map(|u| Rater {
                    name: u.name.clone(),
                    email: u.email.clone(),
                    rating: r.value,
                })
            })
            .collect();
        raters.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.email.cmp(&b.email)));

        Ok(OwnerDashboard {
            store_name: store.name,
            average_rating: store.rating,
            total_ratings: ratings.len() as u64,
            raters,
        })
    }

    /// Admin view of a user; `storeRating` is set for owners with a store.
    pub async fn user_details(&self, id: Uuid) -> StoreResult<UserDetails> {
        let user = self
            .users
            .get_by_id(id)
            .await?
            .ok_or(StoreError::UserNotFound(id))?;

        let store_rating = if user.role == Role::StoreOwner {
            self.stores.first_owned_by(id).await?.map(|s| s.rating)
        } else {
            None
        };

        Ok(UserDetails {
            id: user.id,
            name: user.name,
            email: user.email,
            address: user.address,
            role: user.role,
            store_rating,
        })
    }
}
