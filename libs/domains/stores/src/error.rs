use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_users::UserError;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

pub const INVALID_OWNER_MESSAGE: &str = "ownerId must be a valid store-owner";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store not found: {0}")]
    StoreNotFound(Uuid),

    #[error("No store owned by user {0}")]
    NoOwnedStore(Uuid),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("{INVALID_OWNER_MESSAGE}")]
    InvalidOwner,

    #[error("Invalid rating: {0}")]
    InvalidRating(i32),

    #[error(transparent)]
    User(#[from] UserError),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::StoreNotFound(_) | StoreError::NoOwnedStore(_) => {
                AppError::NotFound("Store not found".to_string())
            }
            StoreError::UserNotFound(_) => AppError::NotFound("User not found".to_string()),
            StoreError::InvalidOwner => AppError::BadRequest(INVALID_OWNER_MESSAGE.to_string()),
            StoreError::InvalidRating(_) => {
                AppError::BadRequest(domain_users::validation::RATING_MESSAGE.to_string())
            }
            StoreError::User(e) => e.into(),
            StoreError::Database(e) => AppError::Database(e),
            StoreError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
