use axum::{Router, middleware::from_fn_with_state, routing::get};
use axum_helpers::{JwtAuth, jwt_auth_middleware};
use domain_stores::{PgStoreRepository, StoreRepository, StoreService};
use domain_users::{PgUserRepository, UserRepository, UserService};

use crate::state::AppState;

pub mod health;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
pub fn routes(state: &AppState) -> Router {
    compose(
        PgUserRepository::new(state.db.clone()),
        PgStoreRepository::new(state.db.clone()),
        state.jwt.clone(),
    )
}

/// Route tree over any repository pair.
///
/// - `/auth`: public
/// - `/admin`, `/user`, `/store`: bearer token required, then each route
///   checks the caller's role for its capability
pub fn compose<U, S>(users: U, stores: S, jwt: JwtAuth) -> Router
where
    U: UserRepository + Clone + 'static,
    S: StoreRepository + 'static,
{
    use domain_stores::handlers as store_handlers;
    use domain_users::handlers as user_handlers;

    let user_service = UserService::new(users.clone(), jwt.clone());
    let store_service = StoreService::new(stores, users);

    let admin = user_handlers::admin_router(user_service.clone())
        .merge(store_handlers::admin_router(store_service.clone()));
    let user = user_handlers::account_router(user_service.clone())
        .merge(store_handlers::user_router(store_service.clone()));
    let owner = store_handlers::owner_router(store_service);

    let protected = Router::new()
        .nest("/admin", admin)
        .nest("/user", user)
        .nest("/store", owner)
        .route_layer(from_fn_with_state(jwt, jwt_auth_middleware));

    Router::new()
        .nest("/auth", user_handlers::auth_router(user_service))
        .merge(protected)
}

/// Creates a router with the /ready endpoint that performs actual health checks.
///
/// This router has state applied and can be merged with the stateless app router
/// from `create_router`.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
