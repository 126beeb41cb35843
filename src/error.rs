//!
//! # Application Errors
//!
//! This module defines `AppError`, the error type returned by services and
//! HTTP handlers. Each variant maps onto one HTTP status code through
//! `actix_web::error::ResponseError`, so a handler can simply return
//! `Result<_, AppError>` and let Actix render the JSON error body.
//!
//! Store-layer failures (`StoreError`), validation failures and
//! token-encoding errors convert into `AppError` via `From`, which keeps `?`
//! usable across the handler → service → store layers.
//!
//! Server-side failures never expose their detail to the client: the detail
//! is logged and the body carries a fixed `"internal server error"` message.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::repository::StoreError;

/// Message returned for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

const INTERNAL_ERROR: &str = "internal server error";

/// Represents all possible errors surfaced by the API.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing request fields, or failed validation (HTTP 400).
    BadRequest(String),
    /// The resource already exists, e.g. a duplicate email (HTTP 409).
    Conflict(String),
    /// Login failed. Deliberately carries no detail (HTTP 401).
    InvalidCredentials,
    /// Missing, malformed or expired bearer token (HTTP 401).
    Unauthorized(String),
    /// No entity with the requested id (HTTP 404).
    NotFound(String),
    /// Unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// A storage backend failure (HTTP 500).
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InvalidCredentials => write!(f, "Unauthorized: {}", INVALID_CREDENTIALS),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// The message placed in the `error` field of the response body.
    fn public_message(&self) -> &str {
        match self {
            AppError::BadRequest(msg)
            | AppError::Conflict(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg) => msg,
            AppError::InvalidCredentials => INVALID_CREDENTIALS,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => INTERNAL_ERROR,
        }
    }
}

/// Converts `AppError` variants into JSON `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.public_message()
        }))
    }
}

/// Converts store-layer failures.
///
/// `NotFound` and `AlreadyExists` pass through with their meaning intact;
/// everything else becomes a generic server error.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::NotFound => AppError::NotFound("not found".into()),
            StoreError::AlreadyExists => AppError::Conflict("user already exists".into()),
            StoreError::Database(e) => AppError::DatabaseError(e.to_string()),
            StoreError::Poisoned => AppError::InternalServerError("store lock poisoned".into()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::BadRequest`.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::BadRequest(error.to_string())
    }
}

/// Token encoding failures are server faults; verification failures are
/// handled explicitly by the token module and never reach this conversion.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::InternalServerError(format!("Failed to sign token: {}", error))
    }
}
