//! Query-string extractor with validation.

use super::FieldOrder;
use crate::errors::{AppError, ordered_validation_message};
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Like [`axum::extract::Query`], but rejects with a 400 `{"message"}` body
/// and runs `Validate` on the result.
///
/// Unknown enum values in the query (for example `sortBy=password`) fail
/// deserialization and are reported the same way.
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + FieldOrder,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(data) = Query::<T>::from_request_parts(parts, state).await?;
        data.validate()
            .map_err(|e| AppError::InvalidInput(ordered_validation_message(&e, T::FIELD_ORDER)))?;
        Ok(ValidatedQuery(data))
    }
}
