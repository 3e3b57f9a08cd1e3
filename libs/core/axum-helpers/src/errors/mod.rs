pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Error as UuidError;
use validator::ValidationErrors;

/// Body of every error response.
///
/// ```json
/// { "message": "Email already in use" }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Application error type that can be converted to HTTP responses.
///
/// Domain crates convert their own error enums into this type; the
/// `IntoResponse` impl is the single place where status codes, client
/// messages and log levels are decided.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryExtractorRejection(#[from] QueryRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    /// A validation failure already reduced to the message clients see
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("UUID error: {0}")]
    UuidError(#[from] UuidError),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// Status, log code and client-facing message for this error.
    fn parts(&self) -> (StatusCode, ErrorCode, String) {
        match self {
            AppError::Database(e) => {
                let code = map_db_error(e);
                let status = match code {
                    ErrorCode::DatabaseConnection => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, code, code.default_message().to_string())
            }
            AppError::JsonExtractorRejection(e) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidJson,
                e.body_text(),
            ),
            AppError::QueryExtractorRejection(e) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidQuery,
                e.body_text(),
            ),
            AppError::ValidationError(e) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::ValidationError,
                first_validation_message(e),
            ),
            AppError::InvalidInput(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::ValidationError,
                msg.clone(),
            ),
            AppError::UuidError(_) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidUuid,
                ErrorCode::InvalidUuid.default_message().to_string(),
            ),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadRequest, msg.clone())
            }
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, msg.clone())
            }
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg.clone()),
            AppError::InternalServerError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalError,
                ErrorCode::InternalError.default_message().to_string(),
            ),
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                msg.clone(),
            ),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.parts().0
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if code.is_server_error() {
            tracing::error!(error_code = code.code(), error = ?self, "{}", code);
        } else if matches!(code, ErrorCode::Unauthorized | ErrorCode::Forbidden) {
            tracing::warn!(error_code = code.code(), %message, "{}", code);
        } else {
            tracing::info!(error_code = code.code(), %message, "{}", code);
        }

        (status, Json(ErrorResponse { message })).into_response()
    }
}

/// Classifies a SeaORM error. Details stay in the logs.
fn map_db_error(error: &DbErr) -> ErrorCode {
    match error {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => ErrorCode::DatabaseConnection,
        DbErr::RecordNotFound(_) => ErrorCode::DatabaseNotFound,
        _ => ErrorCode::DatabaseError,
    }
}

/// Picks one message out of a set of validation failures.
///
/// Fields are visited in alphabetical order so the same invalid payload
/// always yields the same message.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    ordered_validation_message(errors, &[])
}

/// Like [`first_validation_message`], but fields named in `order` are
/// visited first, in that order. Remaining fields follow alphabetically.
pub fn ordered_validation_message(errors: &ValidationErrors, order: &[&str]) -> String {
    let rank = |field: &str| order.iter().position(|f| *f == field).unwrap_or(order.len());

    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| rank(&a.0).cmp(&rank(&b.0)).then_with(|| a.0.cmp(&b.0)));

    fields
        .into_iter()
        .find_map(|(field, errs)| {
            errs.first().map(|err| {
                err.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {field}"))
            })
        })
        .unwrap_or_else(|| ErrorCode::ValidationError.default_message().to_string())
}

/// Shorthand for an error response without going through [`AppError`].
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}
