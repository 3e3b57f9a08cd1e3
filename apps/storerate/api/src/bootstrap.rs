use domain_users::{AdminSeed, UserRepository, UserService};
use tracing::info;

/// Make sure the configured administrator exists.
///
/// Registration only ever creates `user` accounts, so without this the
/// platform would have no way to get its first admin.
pub async fn ensure_admin<R: UserRepository>(
    service: &UserService<R>,
    seed: Option<AdminSeed>,
) -> eyre::Result<()> {
    let Some(seed) = seed else {
        info!("No bootstrap admin configured (ADMIN_NAME/ADMIN_EMAIL/ADMIN_PASSWORD)");
        return Ok(());
    };

    let created = service
        .ensure_admin(seed)
        .await
        .map_err(|e| eyre::eyre!("Bootstrap admin failed: {}", e))?;
    if created {
        info!("Bootstrap admin account created");
    }
    Ok(())
}
