use axum_helpers::{CorsConfig, JwtConfig};
use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_optional, server::ServerConfig};
use database::postgres::PostgresConfig;
use domain_users::AdminSeed;

pub use core_config::Environment;

/// Address recorded for the bootstrap admin when `ADMIN_ADDRESS` is unset
pub const DEFAULT_ADMIN_ADDRESS: &str = "Platform headquarters";

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub jwt: JwtConfig,
    /// Administrator ensured at startup, if configured
    pub admin: Option<AdminSeed>,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let cors = CorsConfig::from_env()?;
        let jwt = JwtConfig::from_env()?;
        let admin = admin_seed_from_env()?;

        Ok(Self {
            app: app_info!(),
            database,
            server,
            cors,
            jwt,
            admin,
            environment,
        })
    }
}

/// `ADMIN_NAME`, `ADMIN_EMAIL` and `ADMIN_PASSWORD` go together: all set
/// yields a seed, none set yields `None`, anything in between is an error.
pub fn admin_seed_from_env() -> Result<Option<AdminSeed>, ConfigError> {
    let name = env_optional("ADMIN_NAME");
    let email = env_optional("ADMIN_EMAIL");
    let password = env_optional("ADMIN_PASSWORD");

    match (name, email, password) {
        (Some(name), Some(email), Some(password)) => Ok(Some(AdminSeed {
            name,
            email,
            password,
            address: env_optional("ADMIN_ADDRESS")
                .unwrap_or_else(|| DEFAULT_ADMIN_ADDRESS.to_string()),
        })),
        (None, None, None) => Ok(None),
        (name, email, _) => {
            let missing = [
                ("ADMIN_NAME", name.is_none()),
                ("ADMIN_EMAIL", email.is_none()),
            ]
            .into_iter()
            .find(|(_, missing)| *missing)
            .map_or("ADMIN_PASSWORD", |(key, _)| key);
            Err(ConfigError::MissingEnvVar(missing.to_string()))
        }
    }
}
