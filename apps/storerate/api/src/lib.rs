//! Store rating HTTP service.
//!
//! The binary in `main.rs` wires PostgreSQL repositories into
//! [`api::routes`]; tests use [`api::compose`] with in-memory ones.

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod openapi;
pub mod state;

pub use config::Config;
pub use state::AppState;
