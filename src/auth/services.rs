use tracing::{info, warn};

use super::{
    jwt::JwtKeys,
    password::{hash_password_blocking, verify_dummy_blocking, verify_password_blocking},
    repo::{CredentialStoreError, UserStore},
    repo_types::User,
};
use crate::error::AppError;

/// Creates a credential record. No token is issued here.
pub async fn register(
    users: &dyn UserStore,
    name: &str,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    if users.find_by_email(email).await?.is_some() {
        warn!(email, "email already registered");
        return Err(AppError::AlreadyExists);
    }

    let hash = hash_password_blocking(password.to_string()).await?;

    match users.insert(name, email, &hash).await {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "user registered");
            Ok(user)
        }
        // A concurrent registration won between the lookup and the insert.
        Err(CredentialStoreError::DuplicateKey) => {
            warn!(email, "email registered concurrently");
            Err(AppError::AlreadyExists)
        }
        Err(CredentialStoreError::Backend(e)) => Err(AppError::Store(e)),
    }
}

/// Checks credentials and mints a session token for `{name, email}`.
///
/// Unknown email and wrong password are reported identically.
pub async fn login(
    users: &dyn UserStore,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> Result<(User, String), AppError> {
    let Some(user) = users.find_by_email(email).await? else {
        verify_dummy_blocking(password.to_string()).await;
        warn!(email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    let ok = verify_password_blocking(password.to_string(), user.password_hash.clone()).await?;
    if !ok {
        warn!(email, user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = keys.sign(&user.name, &user.email)?;
    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((user, token))
}
