//! PostgreSQL connectivity for the workspace.
//!
//! - `postgres` (default): SeaORM connection pool, migrations, health check
//! - `config`: `PostgresConfig: core_config::FromEnv`
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{self, PostgresConfig};
//!
//! let db = postgres::connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! postgres::run_migrations::<migration::Migrator>(&db, "storerate_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
