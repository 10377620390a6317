//! Startup tasks that run before the server accepts requests.

use yamdb_db::DbPool;

use crate::config::SuperuserConfig;

/// Create or promote the configured superuser account.
///
/// The account signs in like any other, through signup and a confirmation
/// code; it only gains the admin role and the staff and superuser flags.
pub async fn ensure_superuser(pool: &DbPool, config: &SuperuserConfig) -> Result<(), sqlx::Error> {
    let user =
        yamdb_db::repositories::UserRepo::ensure_superuser(pool, &config.username, &config.email)
            .await?;
    tracing::info!(user_id = user.id, username = %user.username, "Superuser ensured");
    Ok(())
}
