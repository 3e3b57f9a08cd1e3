//! Custom extractors for Axum handlers.
//!
//! Every rejection is rendered through [`AppError`](crate::errors::AppError),
//! so clients get the same `{"message": ...}` body regardless of which
//! extractor failed.

pub mod uuid_path;
pub mod validated_json;
pub mod validated_query;

/// Order in which a request's fields are checked when reporting a
/// validation failure. Only the first failing field's message is returned.
///
/// Names are the Rust field names, as [`validator`] reports them. Fields not
/// listed are checked afterwards, alphabetically.
pub trait FieldOrder {
    const FIELD_ORDER: &'static [&'static str] = &[];
}

pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
pub use validated_query::ValidatedQuery;
