//! Bearer-token authentication.
//!
//! - [`JwtAuth`] signs and verifies HS256 tokens carrying the user id and role
//! - [`jwt_auth_middleware`] rejects requests without a valid token and
//!   stores the decoded [`JwtClaims`] in the request extensions
//!
//! Role checks live with the role type in the users domain; this module only
//! knows the role as a string.
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let protected = Router::new()
//!     .route("/me", get(handler))
//!     .route_layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{JwtAuth, JwtClaims, TOKEN_TTL};
pub use middleware::jwt_auth_middleware;
