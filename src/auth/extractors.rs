use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;

/// Identity of the caller, taken from a verified access token.
///
/// `AuthMiddleware` inserts this into the request extensions; handlers on
/// protected routes take it as an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().cloned() {
            Some(user) => ready(Ok(user)),
            // Only reachable when a route is missing `AuthMiddleware`.
            None => ready(Err(AppError::Unauthorized("missing bearer token".into()).into())),
        }
    }
}
