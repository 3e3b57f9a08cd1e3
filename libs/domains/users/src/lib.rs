//! Users Domain
//!
//! Accounts, roles and authentication for the store rating platform.
//!
//! ```text
//! handlers ─► service ─► repository (trait) ─► InMemory / Pg
//!                │
//!                └─► argon2 hashing, JWT issuing (axum_helpers::JwtAuth)
//! ```
//!
//! [`access`] holds the closed [`Role`] enum, the capability table and the
//! route guard used by every other domain.
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_users::{InMemoryUserRepository, UserService, handlers};
//!
//! let jwt = JwtAuth::new(&JwtConfig::new("a-secret-that-is-at-least-32-chars!!"));
//! let service = UserService::new(InMemoryUserRepository::new(), jwt);
//!
//! let auth = handlers::auth_router(service.clone());
//! let admin = handlers::admin_router(service);
//! ```

pub mod access;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod validation;

pub use access::{Capability, CurrentUser, Role, guarded, require_capability};
pub use error::{UserError, UserResult};
pub use handlers::{AccountApiDoc, AdminUsersApiDoc, AuthApiDoc};
pub use models::{
    AdminSeed, AuthResponse, AuthUser, ChangePasswordRequest, CreateUserRequest, LoginRequest,
    MessageResponse, RegisterRequest, SortOrder, User, UserFilter, UserResponse, UserSortField,
};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
