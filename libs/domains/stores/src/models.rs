use axum_helpers::FieldOrder;
use chrono::{DateTime, Utc};
use domain_users::models::{contains_ignore_case, filter_term};
use domain_users::{Role, SortOrder};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Rounded mean of `values`, two decimal places, halves away from zero.
/// `0.00` when there are no values.
///
/// ```
/// use domain_stores::models::average_rating;
///
/// assert_eq!(average_rating(&[4, 2]).to_string(), "3.00");
/// assert_eq!(average_rating(&[5, 2]).to_string(), "3.50");
/// assert_eq!(average_rating(&[]).to_string(), "0.00");
/// ```
pub fn average_rating(values: &[i32]) -> Decimal {
    let mut average = if values.is_empty() {
        Decimal::ZERO
    } else {
        let sum: i64 = values.iter().map(|v| i64::from(*v)).sum();
        (Decimal::from(sum) / Decimal::from(values.len() as u64))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    };
    average.rescale(2);
    average
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    /// Mean of all ratings, two decimals, serialized as a string
    #[schema(value_type = String, example = "3.50")]
    pub rating: Decimal,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub fn new(name: String, email: String, address: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            email,
            address,
            rating: average_rating(&[]),
            owner_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rating {
    pub id: Uuid,
    pub user_id: Uuid,
    pub store_id: Uuid,
    pub value: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStoreRequest {
    #[serde(default)]
    #[validate(custom(function = "domain_users::validation::validate_name"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "domain_users::validation::validate_email"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "domain_users::validation::validate_address"))]
    pub address: String,
}

impl FieldOrder for CreateStoreRequest {
    const FIELD_ORDER: &'static [&'static str] = &["name", "email", "address"];
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignOwnerRequest {
    #[serde(default)]
    pub owner_id: Option<Uuid>,
}

impl FieldOrder for AssignOwnerRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignOwnerResponse {
    pub message: String,
    pub store: Store,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OwnerSummary {
    pub name: String,
    pub email: String,
}

/// Store as listed to admins, with its owner's contact details.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStoreResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    #[schema(value_type = String, example = "4.25")]
    pub rating: Decimal,
    pub owner_id: Option<Uuid>,
    pub owner: Option<OwnerSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminStoreResponse {
    pub fn new(store: Store, owner: Option<OwnerSummary>) -> Self {
        Self {
            id: store.id,
            name: store.name,
            email: store.email,
            address: store.address,
            rating: store.rating,
            owner_id: store.owner_id,
            owner,
            created_at: store.created_at,
            updated_at: store.updated_at,
        }
    }
}

/// Store as browsed by a user, with the caller's own rating if any.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStoreView {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    #[schema(value_type = String, example = "3.00")]
    pub rating: Decimal,
    pub user_rating: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_stores: u64,
    pub total_ratings: u64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingRequest {
    pub store_id: Uuid,
    #[serde(default)]
    #[validate(range(min = 1, max = 5, message = "Rating must be 1-5"))]
    pub rating: i32,
}

impl FieldOrder for SubmitRatingRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitRatingResponse {
    pub message: String,
    pub rating: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Rater {
    pub name: String,
    pub email: String,
    pub rating: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDashboard {
    pub store_name: String,
    #[schema(value_type = String, example = "3.50")]
    pub average_rating: Decimal,
    pub total_ratings: u64,
    /// Ordered by name, then email
    pub raters: Vec<Rater>,
}

/// Admin view of one user, with the cached rating of the store they own.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub role: Role,
    #[schema(value_type = Option<String>, example = "4.00")]
    pub store_rating: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StoreSortField {
    #[default]
    Name,
    Email,
    Address,
    Rating,
}

/// Query filters for the admin store list
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[serde(default, rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StoreFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub sort_by: Option<StoreSortField>,
    pub order: Option<SortOrder>,
}

impl FieldOrder for StoreFilter {}

/// Query filters for browsing stores as a user
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[serde(default, rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BrowseStoresQuery {
    pub name: Option<String>,
    pub address: Option<String>,
    pub sort_by: Option<StoreSortField>,
    pub order: Option<SortOrder>,
}

impl FieldOrder for BrowseStoresQuery {}

impl From<BrowseStoresQuery> for StoreFilter {
    fn from(query: BrowseStoresQuery) -> Self {
        Self {
            name: query.name,
            email: None,
            address: query.address,
            sort_by: query.sort_by,
            order: query.order,
        }
    }
}

impl StoreFilter {
    pub fn matches(&self, store: &Store) -> bool {
        filter_term(&self.name).is_none_or(|t| contains_ignore_case(&store.name, t))
            && filter_term(&self.email).is_none_or(|t| contains_ignore_case(&store.email, t))
            && filter_term(&self.address).is_none_or(|t| contains_ignore_case(&store.address, t))
    }

    pub fn compare(&self, a: &Store, b: &Store) -> std::cmp::Ordering {
        let ordering = match self.sort_by.unwrap_or_default() {
            StoreSortField::Name => a.name.cmp(&b.name),
            StoreSortField::Email => a.email.cmp(&b.email),
            StoreSortField::Address => a.address.cmp(&b.address),
            StoreSortField::Rating => a.rating.cmp(&b.rating),
        };
        self.order.unwrap_or_default().apply(ordering)
    }
}
