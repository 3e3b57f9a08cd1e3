use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, SqlErr,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{UserError, UserResult},
    models::{SortOrder, User, UserFilter, UserSortField, filter_term},
    repository::UserRepository,
};

/// `%term%` with LIKE wildcards in the term escaped (PostgreSQL's default
/// escape character is `\`).
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

impl From<SortOrder> for Order {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

/// PostgreSQL implementation of UserRepository using SeaORM
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn map_insert_error(err: DbErr, email: &str) -> UserError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => UserError::DuplicateEmail(email.to_string()),
        _ => UserError::Database(err),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let email = user.email.clone();
        let active_model: entity::ActiveModel = user.into();

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| map_insert_error(e, &email))?;

        tracing::info!(user_id = %model.id, role = %model.role, "Created user");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }

    async fn get_many(&self, ids: Vec<Uuid>) -> UserResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = entity::Entity::find()
            .filter(entity::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>> {
        let mut query = entity::Entity::find();

        if let Some(name) = filter_term(&filter.name) {
            query = query.filter(Expr::col(entity::Column::Name).ilike(like_pattern(name)));
        }
        if let Some(email) = filter_term(&filter.email) {
            query = query.filter(Expr::col(entity::Column::Email).ilike(like_pattern(email)));
        }
        if let Some(address) = filter_term(&filter.address) {
            query = query.filter(Expr::col(entity::Column::Address).ilike(like_pattern(address)));
        }
        if let Some(role) = filter.role {
            query = query.filter(entity::Column::Role.eq(role));
        }

        let column = match filter.sort_by.unwrap_or_default() {
            UserSortField::Name => entity::Column::Name,
            UserSortField::Email => entity::Column::Email,
            UserSortField::Address => entity::Column::Address,
            UserSortField::Role => entity::Column::Role,
        };

        let models = query
            .order_by(column, filter.order.unwrap_or_default().into())
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> UserResult<()> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::PasswordHash, Expr::value(password_hash))
            .filter(entity::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(UserError::NotFound(id));
        }

        tracing::info!(user_id = %id, "Updated password");
        Ok(())
    }

    async fn count(&self) -> UserResult<u64> {
        Ok(entity::Entity::find().count(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("elm"), "%elm%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
