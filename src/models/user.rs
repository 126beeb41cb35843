use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered account as held by the user stores.
///
/// Deliberately not `Serialize`: the password hash must never leave the
/// process. Use [`PublicUser`] for anything sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: String,
    /// Always stored in normalized form, see [`normalize_email`].
    pub email: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// The user representation returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Trims surrounding whitespace and lowercases an email address.
///
/// Uniqueness and lookups are always done on this form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
