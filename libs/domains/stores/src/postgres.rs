use async_trait::async_trait;
use chrono::Utc;
use domain_users::models::filter_term;
use domain_users::postgres::like_pattern;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity::{rating, store},
    error::{StoreError, StoreResult},
    models::{Rating, Store, StoreFilter, StoreSortField, average_rating},
    repository::StoreRepository,
};

/// PostgreSQL implementation of StoreRepository using SeaORM
#[derive(Clone)]
pub struct PgStoreRepository {
    db: DatabaseConnection,
}

impl PgStoreRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StoreRepository for PgStoreRepository {
    async fn create(&self, new_store: Store) -> StoreResult<Store> {
        let active_model: store::ActiveModel = new_store.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(store_id = %model.id, "Created store");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Store>> {
        let model = store::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self, filter: StoreFilter) -> StoreResult<Vec<Store>> {
        let mut query = store::Entity::find();

        if let Some(name) = filter_term(&filter.name) {
            query = query.filter(Expr::col(store::Column::Name).ilike(like_pattern(name)));
        }
        if let Some(email) = filter_term(&filter.email) {
            query = query.filter(Expr::col(store::Column::Email).ilike(like_pattern(email)));
        }
        if let Some(address) = filter_term(&filter.address) {
            query = query.filter(Expr::col(store::Column::Address).ilike(like_pattern(address)));
        }

        let column = match filter.sort_by.unwrap_or_default() {
            StoreSortField::Name => store::Column::Name,
            StoreSortField::Email => store::Column::Email,
            StoreSortField::Address => store::Column::Address,
            StoreSortField::Rating => store::Column::Rating,
        };

        let models = query
            .order_by(column, filter.order.unwrap_or_default().into())
            .order_by_asc(store::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn set_owner(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Store> {
        let model = store::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::StoreNotFound(id))?;

        let mut active = model.into_active_model();
        active.owner_id = Set(Some(owner_id));
        active.updated_at = Set(Utc::now().into());
        let model = active.update(&self.db).await?;

        tracing::info!(store_id = %id, owner_id = %owner_id, "Assigned store owner");
        Ok(model.into())
    }

    async fn first_owned_by(&self, owner_id: Uuid) -> StoreResult<Option<Store>> {
        let model = store::Entity::find()
            .filter(store::Column::OwnerId.eq(owner_id))
            .order_by_asc(store::Column::CreatedAt)
            .order_by_asc(store::Column::Id)
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }

    async fn upsert_rating(
        &self,
        user_id: Uuid,
        store_id: Uuid,
        value: i32,
    ) -> StoreResult<Rating> {
        let txn = self.db.begin().await?;

        // Row lock serializes concurrent writers on the same store
        store::Entity::find_by_id(store_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(StoreError::StoreNotFound(store_id))?;

        let now: DateTimeWithTimeZone = Utc::now().into();
        let row = rating::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id),
            store_id: Set(store_id),
            value: Set(value),
            created_at: Set(now),
            updated_at: Set(now),
        };
        rating::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([rating::Column::UserId, rating::Column::StoreId])
                    .update_columns([rating::Column::Value, rating::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

        let saved = rating::Entity::find()
            .filter(rating::Column::UserId.eq(user_id))
            .filter(rating::Column::StoreId.eq(store_id))
            .one(&txn)
            .await?
            .ok_or_else(|| StoreError::Internal("rating missing after upsert".to_string()))?;

        let values: Vec<i32> = rating::Entity::find()
            .select_only()
            .column(rating::Column::Value)
            .filter(rating::Column::StoreId.eq(store_id))
            .into_tuple()
            .all(&txn)
            .await?;
        let average = average_rating(&values);

        store::Entity::update_many()
            .col_expr(store::Column::Rating, Expr::value(average))
            .col_expr(store::Column::UpdatedAt, Expr::value(now))
            .filter(store::Column::Id.eq(store_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        tracing::info!(
            user_id = %user_id,
            store_id = %store_id,
            value,
            average = %average,
            "Recorded rating"
        );
        Ok(saved.into())
    }

    async fn ratings_for_store(&self, store_id: Uuid) -> StoreResult<Vec<Rating>> {
        let models = rating::Entity::find()
            .filter(rating::Column::StoreId.eq(store_id))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn ratings_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Rating>> {
        let models = rating::Entity::find()
            .filter(rating::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(store::Entity::find().count(&self.db).await?)
    }

    async fn count_ratings(&self) -> StoreResult<u64> {
        Ok(rating::Entity::find().count(&self.db).await?)
    }
}
