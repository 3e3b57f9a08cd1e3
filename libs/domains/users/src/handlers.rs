use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestValidationResponse, ForbiddenResponse, InternalServerErrorResponse,
        UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::access::{Capability, CurrentUser, Role, guarded};
use crate::error::UserResult;
use crate::models::{
    AuthResponse, AuthUser, ChangePasswordRequest, CreateUserRequest, LoginRequest,
    MessageResponse, RegisterRequest, SortOrder, UserFilter, UserResponse, UserSortField,
};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const AUTH_TAG: &str = "auth";
pub const ADMIN_USERS_TAG: &str = "admin-users";
pub const ACCOUNT_TAG: &str = "account";

/// OpenAPI documentation for `/auth`
#[derive(OpenApi)]
#[openapi(
    paths(register, login),
    components(
        schemas(RegisterRequest, LoginRequest, AuthResponse, AuthUser, Role),
        responses(BadRequestValidationResponse, InternalServerErrorResponse)
    ),
    tags((name = AUTH_TAG, description = "Registration and login"))
)]
pub struct AuthApiDoc;

/// OpenAPI documentation for the admin user endpoints
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user),
    components(
        schemas(CreateUserRequest, UserResponse, UserFilter, UserSortField, SortOrder, Role),
        responses(
            BadRequestValidationResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = ADMIN_USERS_TAG, description = "User management (admin)"))
)]
pub struct AdminUsersApiDoc;

/// OpenAPI documentation for the caller's own account
#[derive(OpenApi)]
#[openapi(
    paths(change_password),
    components(
        schemas(ChangePasswordRequest, MessageResponse),
        responses(BadRequestValidationResponse, UnauthorizedResponse)
    ),
    tags((name = ACCOUNT_TAG, description = "Own account"))
)]
pub struct AccountApiDoc;

/// Public routes: `POST /register`, `POST /login`
pub fn auth_router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(Arc::new(service))
}

/// Admin routes: `GET|POST /users`
///
/// Expects the authentication layer to be applied by the caller.
pub fn admin_router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    Router::new()
        .route(
            "/users",
            guarded(Capability::ManageUsers, get(list_users).post(create_user)),
        )
        .with_state(Arc::new(service))
}

/// Caller's own account: `PUT /password`
///
/// Expects the authentication layer to be applied by the caller.
pub fn account_router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    Router::new()
        .route(
            "/password",
            guarded(Capability::ChangeOwnPassword, put(change_password)),
        )
        .with_state(Arc::new(service))
}

/// Register a new account with the `user` role
#[utoipa::path(
    post,
    path = "/register",
    tag = AUTH_TAG,
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created, token issued", body = AuthResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> UserResult<Json<AuthResponse>> {
    let response = service.register(input).await?;
    Ok(Json(response))
}

/// Exchange credentials for a token
#[utoipa::path(
    post,
    path = "/login",
    tag = AUTH_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = AuthResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<AuthResponse>> {
    let response = service.login(input).await?;
    Ok(Json(response))
}

/// List users with optional filters and sorting
#[utoipa::path(
    get,
    path = "/users",
    tag = ADMIN_USERS_TAG,
    params(UserFilter),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Matching users", body = Vec<UserResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedQuery(filter): ValidatedQuery<UserFilter>,
) -> UserResult<Json<Vec<UserResponse>>> {
    let users = service.list_users(filter).await?;
    Ok(Json(users))
}

/// Create a user with any role
#[utoipa::path(
    post,
    path = "/users",
    tag = ADMIN_USERS_TAG,
    request_body = CreateUserRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUserRequest>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Change the caller's password
#[utoipa::path(
    put,
    path = "/password",
    tag = ACCOUNT_TAG,
    request_body = ChangePasswordRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn change_password<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    caller: CurrentUser,
    ValidatedJson(input): ValidatedJson<ChangePasswordRequest>,
) -> UserResult<Json<MessageResponse>> {
    service.change_password(caller.id, input).await?;
    Ok(Json(MessageResponse::new("Password updated")))
}
