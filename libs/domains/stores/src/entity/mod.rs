//! Sea-ORM entities for the `stores` and `ratings` tables

pub mod rating;
pub mod store;
