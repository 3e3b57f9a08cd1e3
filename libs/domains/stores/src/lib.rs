//! Stores Domain
//!
//! Stores, their 1-5 ratings and the dashboards built from them.
//!
//! Each store keeps a cached `rating`: the mean of all its ratings rounded
//! to two decimals. [`StoreRepository::upsert_rating`] writes a rating and
//! refreshes that cache as one unit of work.
//!
//! # Routers
//!
//! - [`handlers::admin_router`]: store management, owner assignment, totals, user details
//! - [`handlers::user_router`]: browsing and rating
//! - [`handlers::owner_router`]: the owner's dashboard
//!
//! None of them authenticate; mount them behind `jwt_auth_middleware`.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{StoreError, StoreResult};
pub use handlers::{AdminStoresApiDoc, OwnerApiDoc, UserStoresApiDoc};
pub use models::{
    AdminStoreResponse, AssignOwnerRequest, BrowseStoresQuery, CreateStoreRequest,
    DashboardStats, OwnerDashboard, Rating, Store, StoreFilter, StoreSortField,
    SubmitRatingRequest, UserDetails, UserStoreView, average_rating,
};
pub use postgres::PgStoreRepository;
pub use repository::{InMemoryStoreRepository, StoreRepository};
pub use service::StoreService;
