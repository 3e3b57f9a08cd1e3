//! Shared application state, cloned into the routers that need it.

use axum_helpers::JwtAuth;
use database::postgres::DatabaseConnection;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: Config,
    /// PostgreSQL connection pool
    pub db: DatabaseConnection,
    /// Token issuer and verifier shared by login and the auth layer
    pub jwt: JwtAuth,
}

impl AppState {
    pub fn new(config: Config, db: DatabaseConnection) -> Self {
        let jwt = JwtAuth::new(&config.jwt);
        Self { config, db, jwt }
    }
}
