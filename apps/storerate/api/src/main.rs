use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre, install_panic_hook};
use domain_users::{PgUserRepository, UserService};
use tracing::info;

use storerate_api::{AppState, Config, api, bootstrap, openapi};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);
    install_panic_hook();

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
        .await
        .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;

    let state = AppState::new(config, db);

    let users = UserService::new(PgUserRepository::new(state.db.clone()), state.jwt.clone());
    bootstrap::ensure_admin(&users, state.config.admin.clone()).await?;

    let router = axum_helpers::create_router::<openapi::ApiDoc>(
        api::routes(&state),
        &state.config.server,
        &state.config.cors,
    );

    // - /health: liveness check with app name/version
    // - /ready: readiness check with a database ping
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!(
        environment = ?state.config.environment,
        "Starting {} {}",
        state.config.app.name,
        state.config.app.version
    );

    let server = state.config.server.clone();
    create_production_app(app, &server, async move {
        info!("Shutting down: closing database connections");
        match state.db.close().await {
            Ok(_) => info!("PostgreSQL connection closed successfully"),
            Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Shutdown complete");
    Ok(())
}
