use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::header::{HeaderName, HeaderValue},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use uuid::Uuid;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation id of the request being served, kept in the request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Tags every request with an id and echoes it in the `X-Request-Id`
/// response header.
///
/// A non-empty inbound `X-Request-Id` is reused (e.g. one set by a load
/// balancer); otherwise a UUID v4 is minted.
#[derive(Clone, Copy, Default)]
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestIdService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdService { service }))
    }
}

pub struct RequestIdService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestIdService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let header = inbound_id(&req).unwrap_or_else(|| {
            HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
        });
        if let Ok(id) = header.to_str() {
            req.extensions_mut().insert(RequestId(id.to_string()));
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            match fut.await {
                Ok(mut res) => {
                    res.headers_mut().insert(X_REQUEST_ID, header);
                    Ok(res)
                }
                // Errors are rendered later by actix; pre-render so the
                // header survives.
                Err(err) => {
                    let mut res = err.error_response();
                    res.headers_mut().insert(X_REQUEST_ID, header);
                    Err(InternalError::from_response(err, res).into())
                }
            }
        })
    }
}

fn inbound_id(req: &ServiceRequest) -> Option<HeaderValue> {
    let value = req.headers().get(X_REQUEST_ID)?;
    match value.to_str() {
        Ok(id) if !id.trim().is_empty() => Some(value.clone()),
        _ => None,
    }
}
