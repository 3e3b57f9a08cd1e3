//! JSON extractor with automatic validation using the validator crate.

use super::FieldOrder;
use crate::errors::{AppError, ordered_validation_message};
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor with automatic validation.
///
/// Malformed bodies and failed validation both produce a 400 whose message
/// is the first failing rule, taken in [`FieldOrder`].
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::post;
/// use axum_helpers::extractors::{FieldOrder, ValidatedJson};
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct CreateStore {
///     #[validate(length(min = 20, max = 60))]
///     name: String,
///     #[validate(email)]
///     email: String,
/// }
///
/// impl FieldOrder for CreateStore {
///     const FIELD_ORDER: &'static [&'static str] = &["name", "email"];
/// }
///
/// async fn create_store(ValidatedJson(payload): ValidatedJson<CreateStore>) -> String {
///     format!("Creating store: {}", payload.name)
/// }
///
/// let app = Router::new().route("/stores", post(create_store));
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + FieldOrder,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()
            .map_err(|e| AppError::InvalidInput(ordered_validation_message(&e, T::FIELD_ORDER)))?;
        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::{Request, StatusCode}, routing::post};
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Payload {
        #[validate(range(min = 1, max = 5, message = "Rating must be 1-5"))]
        rating: i32,
        #[serde(default)]
        #[validate(length(max = 3, message = "Note too long"))]
        note: String,
    }

    impl FieldOrder for Payload {
        const FIELD_ORDER: &'static [&'static str] = &["rating", "note"];
    }

    async fn handler(ValidatedJson(p): ValidatedJson<Payload>) -> String {
        p.rating.to_string()
    }

    async fn send(body: &'static str) -> (StatusCode, String) {
        let app = Router::new().route("/", post(handler));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_valid_payload_passes() {
        let (status, body) = send(r#"{"rating": 4}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "4");
    }

    #[tokio::test]
    async fn test_invalid_payload_returns_rule_message() {
        let (status, body) = send(r#"{"rating": 6}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["message"], "Rating must be 1-5");
    }

    #[tokio::test]
    async fn test_declared_field_order_picks_message() {
        let (status, body) = send(r#"{"rating": 9, "note": "far too long"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["message"], "Rating must be 1-5");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (status, body) = send(r#"{"rating": "#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json["message"].is_string());
    }

    #[tokio::test]
    async fn test_wrong_type_is_bad_request() {
        let (status, _) = send(r#"{"rating": "five"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
