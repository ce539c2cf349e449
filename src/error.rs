//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure a handler, the auth middleware, or a store can produce is one of its
//! variants, and each variant maps to exactly one HTTP status.
//!
//! `AppError` implements `actix_web::error::ResponseError`, rendering every error as a
//! JSON body of the form `{"message": "..."}`. Persistence and hashing failures are
//! logged in full and reported to the client with a fixed, sanitized message.
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error` and `bcrypt::BcryptError` allow the `?` operator.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// A required field was missing or empty, or the body could not be parsed (HTTP 400).
    ValidationError(String),
    /// The resource already exists, e.g. a duplicate email (HTTP 409).
    Conflict(String),
    /// Email/password pair did not match a registered user (HTTP 401).
    ///
    /// Unknown email and wrong password deliberately share this variant.
    InvalidCredentials,
    /// Authentication is required or the presented token was rejected (HTTP 401).
    Unauthorized(String),
    /// The authenticated user does not own the resource (HTTP 403).
    AccessDenied(String),
    /// The requested resource does not exist (HTTP 404).
    NotFound(String),
    /// A persistence-layer operation failed (HTTP 500).
    /// The wrapped detail is logged, never sent to the client.
    StoreFailure(String),
    /// Any other unexpected server-side failure, e.g. hashing or signing (HTTP 500).
    /// The wrapped detail is logged, never sent to the client.
    InternalServerError(String),
}

impl AppError {
    /// The message sent to the client for this error.
    pub fn client_message(&self) -> String {
        match self {
            AppError::ValidationError(msg)
            | AppError::Conflict(msg)
            | AppError::Unauthorized(msg)
            | AppError::AccessDenied(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::StoreFailure(_) => "Database error".to_string(),
            AppError::InternalServerError(_) => "Internal server error".to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::AccessDenied(msg) => write!(f, "Access Denied: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::StoreFailure(msg) => write!(f, "Store Failure: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Server-side failures are logged here, at the request boundary, so the detail is
/// recorded exactly once regardless of where the error was raised.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::AccessDenied(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StoreFailure(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.client_message()
        }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// A unique-constraint violation becomes a generic `Conflict`; stores that know which
/// constraint was hit map it themselves before falling back to this conversion.
/// Everything else is a `StoreFailure`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        if is_unique_violation(&error) {
            return AppError::Conflict("Resource already exists".into());
        }
        AppError::StoreFailure(error.to_string())
    }
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

impl From<ValidationErrors> for AppError {
    fn from(_: ValidationErrors) -> AppError {
        AppError::ValidationError("All fields are required".into())
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
///
/// Signature mismatches, malformed tokens and expired claims are not distinguished
/// in the response.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::debug!("token rejected: {}", error);
        AppError::Unauthorized("Invalid token".into())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("password hashing failed: {}", error))
    }
}
