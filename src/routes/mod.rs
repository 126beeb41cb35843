pub mod auth;
pub mod boards;
pub mod health;

use std::sync::Arc;

use actix_web::{error::JsonPayloadError, web, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthMiddleware, TokenKeys};
use crate::error::AppError;

/// Envelope for every successful JSON response: `{"data": ...}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Mounts the API routes. Intended for a `/api/v1` scope.
///
/// `/auth/register` and `/auth/login` are public; `/auth/me` and everything
/// under `/boards` go through [`AuthMiddleware`].
pub fn config(keys: Arc<TokenKeys>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(json_config())
            .service(
                web::scope("/auth")
                    .service(auth::register)
                    .service(auth::login)
                    .service(
                        web::resource("/me")
                            .wrap(AuthMiddleware::new(Arc::clone(&keys)))
                            .route(web::get().to(auth::me)),
                    ),
            )
            .service(
                web::scope("/boards")
                    .wrap(AuthMiddleware::new(keys))
                    .service(boards::list_boards)
                    .service(boards::create_board)
                    .service(boards::get_board)
                    .service(boards::update_board)
                    .service(boards::delete_board),
            );
    }
}

/// Unparseable or mistyped JSON bodies all get the same 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, req: &HttpRequest| {
        log::debug!("rejected body for {} {}: {}", req.method(), req.path(), err);
        AppError::BadRequest("invalid body".into()).into()
    })
}
