use std::any::Any;
use std::panic::AssertUnwindSafe;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use futures::FutureExt;

use crate::error::AppError;
use crate::middleware::request_id::RequestId;

/// Turns a panic in any wrapped handler into a 500 JSON response.
///
/// The panic is logged with the request id (when `RequestIdMiddleware` runs
/// outside this one) and the worker keeps serving other requests.
#[derive(Clone, Copy, Default)]
pub struct CatchPanic;

impl<S, B> Transform<S, ServiceRequest> for CatchPanic
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = CatchPanicService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CatchPanicService { service }))
    }
}

pub struct CatchPanicService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for CatchPanicService<S>
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
        // Owned copies only: the router needs sole ownership of the request.
        let origin = Origin {
            method: req.method().to_string(),
            path: req.path().to_string(),
            request_id: req
                .extensions()
                .get::<RequestId>()
                .map(|id| id.0.clone())
                .unwrap_or_else(|| "-".to_string()),
        };

        let fut = match std::panic::catch_unwind(AssertUnwindSafe(|| self.service.call(req))) {
            Ok(fut) => fut,
            Err(payload) => return Box::pin(ready(Err(origin.into_error(payload)))),
        };

        Box::pin(async move {
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(res) => res,
                Err(payload) => Err(origin.into_error(payload)),
            }
        })
    }
}

struct Origin {
    method: String,
    path: String,
    request_id: String,
}

impl Origin {
    /// Rendered by actix through `AppError`'s `ResponseError` impl.
    fn into_error(self, payload: Box<dyn Any + Send>) -> Error {
        AppError::InternalServerError(format!(
            "panic in {} {} (request {}): {}",
            self.method,
            self.path,
            self.request_id,
            panic_message(payload.as_ref())
        ))
        .into()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "non-string panic payload"
    }
}
