pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::PublicUser;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password, MAX_PASSWORD_BYTES};
pub use token::{Claims, TokenKeys};

/// Represents the payload for a user login request.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Represents the payload for a new user registration request.
///
/// Emptiness is checked by the auth service after the email is normalized;
/// the bounds here only cap what bcrypt and the stores accept.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(max = 254))]
    pub email: String,
    /// Counted in characters here; the auth service also caps the UTF-8
    /// length at bcrypt's 72-byte input limit.
    #[validate(length(max = 72))]
    pub password: String,
}

/// Response body after successful registration or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: PublicUser,
    /// Signed HS256 access token for the `Authorization: Bearer` header.
    pub token: String,
}
