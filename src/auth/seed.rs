use sea_orm::DatabaseConnection;

use crate::auth::password;
use crate::config::{Config, SeedAccount};
use crate::entity::users::Role;
use crate::error::{AppError, AppResult};
use crate::repository::{NewUser, UserRepository};

/// Create the default admin, and the test user when enabled, if they are missing.
///
/// # Errors
///
/// Returns an error if a lookup, a hash or an insert fails.
pub async fn seed_accounts(db: &DatabaseConnection, config: &Config) -> AppResult<()> {
    seed_account(db, &config.admin, Role::Admin).await?;

    if config.seed_test_user {
        seed_account(db, &config.test_user, Role::User).await?;
    }

    Ok(())
}

async fn seed_account(db: &DatabaseConnection, account: &SeedAccount, role: Role) -> AppResult<()> {
    let repo = UserRepository::new(db);

    if repo.get_by_email(&account.email).await?.is_some()
        || repo.get_by_username(&account.username).await?.is_some()
    {
        tracing::debug!(email = %account.email, ?role, "Seed account already present");
        return Ok(());
    }

    let plain = account.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .map_err(|e| AppError::Internal(format!("hash task failed: {e}")))??;

    repo.create(NewUser {
        email: account.email.trim().to_lowercase(),
        username: account.username.clone(),
        password_hash,
        city: account.city.clone(),
        role,
    })
    .await?;

    tracing::info!(email = %account.email, ?role, "Seed account created");
    Ok(())
}
