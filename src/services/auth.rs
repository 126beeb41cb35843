//! Registration, login and token issuance.

use std::sync::Arc;

use crate::auth::{hash_password, verify_password, TokenKeys, MAX_PASSWORD_BYTES};
use crate::error::AppError;
use crate::models::{normalize_email, User};
use crate::repository::{StoreError, UserStore};

pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: Arc<TokenKeys>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: Arc<TokenKeys>) -> Self {
        Self { users, keys }
    }

    /// Creates an account and returns it with a fresh access token.
    ///
    /// Fails with `BadRequest` when the normalized email or the password is
    /// empty or the password exceeds bcrypt's byte limit, and with `Conflict`
    /// when the email is already registered.
    pub async fn register(&self, email: &str, password: &str) -> Result<(User, String), AppError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(AppError::BadRequest("email and password required".into()));
        }
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::BadRequest(format!(
                "password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }

        let password = password.to_owned();
        let hash = run_blocking(move || hash_password(&password)).await?;
        let user = self.users.create(&email, &hash).await?;
        let token = self.keys.issue(&user)?;

        log::info!("registered user {}", user.id);
        Ok((user, token))
    }

    /// Checks credentials and returns the user with a fresh access token.
    ///
    /// Unknown email, wrong password and any lookup failure all produce the
    /// same `InvalidCredentials` error.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AppError> {
        let email = normalize_email(email);

        let user = match self.users.get_by_email(&email).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                log::warn!("login failed: unknown email");
                return Err(AppError::InvalidCredentials);
            }
            Err(e) => {
                log::error!("login failed: user lookup error: {}", e);
                return Err(AppError::InvalidCredentials);
            }
        };

        let password = password.to_owned();
        let hash = user.password_hash.clone();
        let matches = match run_blocking(move || verify_password(&password, &hash)).await {
            Ok(matches) => matches,
            Err(e) => {
                log::error!("login failed: stored hash for user {} unusable: {}", user.id, e);
                false
            }
        };
        if !matches {
            log::warn!("login failed: wrong password for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        let token = self.keys.issue(&user)?;
        Ok((user, token))
    }

    /// Looks up the account a verified token was issued for.
    pub async fn current_user(&self, user_id: &str) -> Result<User, AppError> {
        Ok(self.users.get_by_id(user_id).await?)
    }
}

/// Runs CPU-heavy bcrypt work off the async worker threads.
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::InternalServerError(format!("blocking task failed: {}", e)))?
}
