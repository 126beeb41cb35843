use std::sync::Arc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderMap},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::extractors::AuthenticatedUser;
use crate::auth::token::TokenKeys;
use crate::error::AppError;

const BEARER_PREFIX: &str = "Bearer ";

/// Rejects requests without a valid bearer token.
///
/// On success the verified identity is stored in the request extensions as an
/// [`AuthenticatedUser`] for handlers to extract. On failure the request is
/// answered with 401 and the wrapped service is never called.
#[derive(Clone)]
pub struct AuthMiddleware {
    keys: Arc<TokenKeys>,
}

impl AuthMiddleware {
    pub fn new(keys: Arc<TokenKeys>) -> Self {
        Self { keys }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            keys: Arc::clone(&self.keys),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    keys: Arc<TokenKeys>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(req.headers(), &self.keys) {
            Ok(user) => {
                req.extensions_mut().insert(user);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(app_err) => {
                log::debug!("rejected {} {}: {}", req.method(), req.path(), app_err);
                let res = req.error_response(app_err).map_into_right_body();
                Box::pin(ready(Ok(res)))
            }
        }
    }
}

/// Checks the `Authorization` header and verifies the bearer token in it.
pub fn authenticate(headers: &HeaderMap, keys: &TokenKeys) -> Result<AuthenticatedUser, AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".into()))?;

    let claims = keys.verify(token)?;
    Ok(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
    })
}
