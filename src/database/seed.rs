use bcrypt::{DEFAULT_COST, hash};
use std::env;
use tracing::info;

use crate::database::connection::DbPool;
use crate::models::user::{User, UserRole};

/// Creates the single admin account on first start. Registration is disabled,
/// so this is the only way a user ever enters the system.
pub async fn ensure_admin_user(pool: &DbPool) -> anyhow::Result<()> {
    let email = env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@localhost".to_string());
    let password = env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

    if User::find_by_email(pool, &email).await?.is_some() {
        return Ok(());
    }

    let password_hash = hash(password.as_bytes(), DEFAULT_COST)?;
    User::insert(pool, &email, &password_hash, UserRole::Admin).await?;
    info!("Seeded admin user: {}", email);

    Ok(())
}
