//! Roles, what each role may do, and the guards that enforce it.
//!
//! Authentication (`axum_helpers::jwt_auth_middleware`) runs first and puts
//! [`JwtClaims`] into the request extensions. The guards here only decide
//! whether the authenticated role holds the capability a route needs.
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use domain_users::access::{Capability, guarded};
//!
//! let router = Router::new()
//!     .route("/dashboard", guarded(Capability::ViewOwnStoreDashboard, get(dashboard)));
//! ```

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};
use axum_helpers::{AppError, JwtClaims};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

pub const FORBIDDEN_MESSAGE: &str = "Forbidden: Insufficient role";

/// Account role, stored as the PostgreSQL enum `user_role`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[default]
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "store-owner")]
    StoreOwner,
}

/// Something a route requires of its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ManageUsers,
    ManageStores,
    ViewPlatformStats,
    BrowseStores,
    RateStores,
    ChangeOwnPassword,
    ViewOwnStoreDashboard,
}

impl Role {
    /// Every capability granted to this role.
    pub fn capabilities(self) -> &'static [Capability] {
        use Capability::*;

        match self {
            Role::Admin => &[
                ManageUsers,
                ManageStores,
                ViewPlatformStats,
                BrowseStores,
                RateStores,
                ChangeOwnPassword,
            ],
            Role::User => &[BrowseStores, RateStores, ChangeOwnPassword],
            Role::StoreOwner => &[
                BrowseStores,
                RateStores,
                ChangeOwnPassword,
                ViewOwnStoreDashboard,
            ],
        }
    }

    pub fn can(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

/// Middleware for `axum::middleware::from_fn_with_state(capability, require_capability)`.
///
/// A role claim that does not name a known role is treated like a role
/// without the capability.
pub async fn require_capability(
    State(capability): State<Capability>,
    claims: JwtClaims,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let allowed = claims
        .role
        .parse::<Role>()
        .map(|role| role.can(capability))
        .unwrap_or(false);

    if !allowed {
        tracing::debug!(role = %claims.role, ?capability, "Capability check failed");
        return Err(AppError::Forbidden(FORBIDDEN_MESSAGE.to_string()));
    }

    Ok(next.run(request).await)
}

/// Wrap a method router so it only runs for roles holding `capability`.
pub fn guarded<S>(capability: Capability, route: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn_with_state(capability, require_capability))
}

/// The authenticated caller, resolved from the token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: Role,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = JwtClaims::from_request_parts(parts, state).await?;
        let id = claims.user_id()?;
        let role = claims
            .role
            .parse::<Role>()
            .map_err(|_| AppError::BadRequest("Invalid token".to_string()))?;

        Ok(Self { id, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, routing::get};
    use axum_helpers::{JwtAuth, JwtConfig, jwt_auth_middleware};
    use tower::ServiceExt;

    const SECRET: &str = "access-test-secret-with-32-characters";

    #[test]
    fn test_role_serializes_kebab_case() {
        assert_eq!(Role::StoreOwner.to_string(), "store-owner");
        assert_eq!("store-owner".parse::<Role>().unwrap(), Role::StoreOwner);
        assert_eq!(
            serde_json::to_string(&Role::Admin).unwrap(),
            "\"admin\""
        );
        assert!("moderator".parse::<Role>().is_err());
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_capability_table() {
        assert!(Role::Admin.can(Capability::ManageUsers));
        assert!(Role::Admin.can(Capability::ViewPlatformStats));
        assert!(!Role::Admin.can(Capability::ViewOwnStoreDashboard));

        assert!(Role::User.can(Capability::RateStores));
        assert!(!Role::User.can(Capability::ManageStores));
        assert!(!Role::User.can(Capability::ViewOwnStoreDashboard));

        assert!(Role::StoreOwner.can(Capability::ViewOwnStoreDashboard));
        assert!(!Role::StoreOwner.can(Capability::ManageUsers));
    }

    #[test]
    fn test_every_role_can_change_password() {
        for role in [Role::Admin, Role::User, Role::StoreOwner] {
            assert!(role.can(Capability::ChangeOwnPassword), "{role}");
        }
    }

    async fn whoami(user: CurrentUser) -> String {
        format!("{}:{}", user.id, user.role)
    }

    fn app(auth: JwtAuth) -> Router {
        Router::new()
            .route("/stats", guarded(Capability::ViewPlatformStats, get(|| async { "ok" })))
            .route("/me", get(whoami))
            .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware))
    }

    async fn call(app: Router, uri: &str, token: &str) -> (StatusCode, String) {
        let request = axum::http::Request::builder()
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_guard_rejects_role_without_capability() {
        let auth = JwtAuth::new(&JwtConfig::new(SECRET));
        let token = auth.create_token(Uuid::now_v7(), "user").unwrap();

        let (status, body) = call(app(auth), "/stats", &token).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.contains(FORBIDDEN_MESSAGE));
    }

    #[tokio::test]
    async fn test_guard_allows_role_with_capability() {
        let auth = JwtAuth::new(&JwtConfig::new(SECRET));
        let token = auth.create_token(Uuid::now_v7(), "admin").unwrap();

        let (status, body) = call(app(auth), "/stats", &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_guard_rejects_unknown_role() {
        let auth = JwtAuth::new(&JwtConfig::new(SECRET));
        let token = auth.create_token(Uuid::now_v7(), "superuser").unwrap();

        let (status, _) = call(app(auth), "/stats", &token).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_current_user_from_claims() {
        let auth = JwtAuth::new(&JwtConfig::new(SECRET));
        let id = Uuid::now_v7();
        let token = auth.create_token(id, "store-owner").unwrap();

        let (status, body) = call(app(auth), "/me", &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("{id}:store-owner"));
    }
}
