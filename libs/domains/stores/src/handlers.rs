use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    UuidPath, ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use domain_users::{Capability, CurrentUser, Role, SortOrder, UserRepository, guarded};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::StoreResult;
use crate::models::{
    AdminStoreResponse, AssignOwnerRequest, AssignOwnerResponse, BrowseStoresQuery,
    CreateStoreRequest, DashboardStats, OwnerDashboard, OwnerSummary, Rater, Store, StoreFilter,
    StoreSortField, SubmitRatingRequest, SubmitRatingResponse, UserDetails, UserStoreView,
};
use crate::repository::StoreRepository;
use crate::service::StoreService;

pub const ADMIN_STORES_TAG: &str = "admin-stores";
pub const USER_STORES_TAG: &str = "user-stores";
pub const OWNER_TAG: &str = "store-owner";

type SharedService<S, U> = State<Arc<StoreService<S, U>>>;

/// OpenAPI documentation for the admin store, dashboard and user-details endpoints
#[derive(OpenApi)]
#[openapi(
    paths(create_store, list_stores, assign_owner, dashboard_stats, user_details),
    components(
        schemas(
            CreateStoreRequest,
            Store,
            AdminStoreResponse,
            OwnerSummary,
            AssignOwnerRequest,
            AssignOwnerResponse,
            DashboardStats,
            UserDetails,
            StoreFilter,
            StoreSortField,
            SortOrder,
            Role
        ),
        responses(
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = ADMIN_STORES_TAG, description = "Store management and platform statistics (admin)"))
)]
pub struct AdminStoresApiDoc;

/// OpenAPI documentation for browsing and rating stores
#[derive(OpenApi)]
#[openapi(
    paths(browse_stores, submit_rating),
    components(
        schemas(
            UserStoreView,
            BrowseStoresQuery,
            SubmitRatingRequest,
            SubmitRatingResponse
        ),
        responses(BadRequestValidationResponse, UnauthorizedResponse, NotFoundResponse)
    ),
    tags((name = USER_STORES_TAG, description = "Browse and rate stores"))
)]
pub struct UserStoresApiDoc;

/// OpenAPI documentation for the store owner's dashboard
#[derive(OpenApi)]
#[openapi(
    paths(owner_dashboard),
    components(
        schemas(OwnerDashboard, Rater),
        responses(UnauthorizedResponse, ForbiddenResponse, NotFoundResponse)
    ),
    tags((name = OWNER_TAG, description = "Feedback on the caller's own store"))
)]
pub struct OwnerApiDoc;

/// Admin routes: `GET|POST /stores`, `PUT /stores/{id}/owner`,
/// `GET /dashboard`, `GET /users/{id}`
///
/// Expects the authentication layer to be applied by the caller.
pub fn admin_router<S, U>(service: StoreService<S, U>) -> Router
where
    S: StoreRepository + 'static,
    U: UserRepository + 'static,
{
    Router::new()
        .route(
            "/stores",
            guarded(Capability::ManageStores, get(list_stores).post(create_store)),
        )
        .route(
            "/stores/{id}/owner",
            guarded(Capability::ManageStores, put(assign_owner)),
        )
        .route(
            "/dashboard",
            guarded(Capability::ViewPlatformStats, get(dashboard_stats)),
        )
        .route("/users/{id}", guarded(Capability::ManageUsers, get(user_details)))
        .with_state(Arc::new(service))
}

/// Signed-in user routes: `GET /stores`, `POST /rating`
pub fn user_router<S, U>(service: StoreService<S, U>) -> Router
where
    S: StoreRepository + 'static,
    U: UserRepository + 'static,
{
    Router::new()
        .route("/stores", guarded(Capability::BrowseStores, get(browse_stores)))
        .route("/rating", guarded(Capability::RateStores, post(submit_rating)))
        .with_state(Arc::new(service))
}

/// Store owner routes: `GET /dashboard`
pub fn owner_router<S, U>(service: StoreService<S, U>) -> Router
where
    S: StoreRepository + 'static,
    U: UserRepository + 'static,
{
    Router::new()
        .route(
            "/dashboard",
            guarded(Capability::ViewOwnStoreDashboard, get(owner_dashboard)),
        )
        .with_state(Arc::new(service))
}

/// Create a store
#[utoipa::path(
    post,
    path = "/stores",
    tag = ADMIN_STORES_TAG,
    request_body = CreateStoreRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Store created", body = Store),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_store<S: StoreRepository, U: UserRepository>(
    State(service): SharedService<S, U>,
    ValidatedJson(input): ValidatedJson<CreateStoreRequest>,
) -> StoreResult<impl IntoResponse> {
    let store = service.create_store(input).await?;
    Ok((StatusCode::CREATED, Json(store)))
}

/// List stores with their owners
#[utoipa::path(
    get,
    path = "/stores",
    tag = ADMIN_STORES_TAG,
    params(StoreFilter),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Matching stores", body = Vec<AdminStoreResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_stores<S: StoreRepository, U: UserRepository>(
    State(service): SharedService<S, U>,
    ValidatedQuery(filter): ValidatedQuery<StoreFilter>,
) -> StoreResult<Json<Vec<AdminStoreResponse>>> {
    let stores = service.list_stores(filter).await?;
    Ok(Json(stores))
}

/// Assign a store owner
#[utoipa::path(
    put,
    path = "/stores/{id}/owner",
    tag = ADMIN_STORES_TAG,
    params(("id" = Uuid, Path, description = "Store id")),
    request_body = AssignOwnerRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Owner assigned", body = AssignOwnerResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn assign_owner<S: StoreRepository, U: UserRepository>(
    State(service): SharedService<S, U>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<AssignOwnerRequest>,
) -> StoreResult<Json<AssignOwnerResponse>> {
    let response = service.assign_owner(id, input).await?;
    Ok(Json(response))
}

/// Platform totals
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = ADMIN_STORES_TAG,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Totals", body = DashboardStats),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse)
    )
)]
async fn dashboard_stats<S: StoreRepository, U: UserRepository>(
    State(service): SharedService<S, U>,
) -> StoreResult<Json<DashboardStats>> {
    let stats = service.dashboard_stats().await?;
    Ok(Json(stats))
}

/// One user with the rating of the store they own
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = ADMIN_STORES_TAG,
    params(("id" = Uuid, Path, description = "User id")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User details", body = UserDetails),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn user_details<S: StoreRepository, U: UserRepository>(
    State(service): SharedService<S, U>,
    UuidPath(id): UuidPath,
) -> StoreResult<Json<UserDetails>> {
    let details = service.user_details(id).await?;
    Ok(Json(details))
}

/// Browse stores with the caller's own rating
#[utoipa::path(
    get,
    path = "/stores",
    tag = USER_STORES_TAG,
    params(BrowseStoresQuery),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Matching stores", body = Vec<UserStoreView>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn browse_stores<S: StoreRepository, U: UserRepository>(
    State(service): SharedService<S, U>,
    caller: CurrentUser,
    ValidatedQuery(query): ValidatedQuery<BrowseStoresQuery>,
) -> StoreResult<Json<Vec<UserStoreView>>> {
    let stores = service.browse(caller.id, query).await?;
    Ok(Json(stores))
}

/// Rate a store, replacing any earlier rating by the caller
#[utoipa::path(
    post,
    path = "/rating",
    tag = USER_STORES_TAG,
    request_body = SubmitRatingRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Rating stored", body = SubmitRatingResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn submit_rating<S: StoreRepository, U: UserRepository>(
    State(service): SharedService<S, U>,
    caller: CurrentUser,
    ValidatedJson(input): ValidatedJson<SubmitRatingRequest>,
) -> StoreResult<Json<SubmitRatingResponse>> {
    let response = service.submit_rating(caller.id, input).await?;
    Ok(Json(response))
}

/// Feedback on the caller's store
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = OWNER_TAG,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Store feedback", body = OwnerDashboard),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn owner_dashboard<S: StoreRepository, U: UserRepository>(
    State(service): SharedService<S, U>,
    caller: CurrentUser,
) -> StoreResult<Json<OwnerDashboard>> {
    let dashboard = service.owner_dashboard(caller.id).await?;
    Ok(Json(dashboard))
}
