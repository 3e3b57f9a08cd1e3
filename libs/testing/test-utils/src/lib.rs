//! Shared test utilities for the domain crates.
//!
//! - `TestDatabase`: PostgreSQL container with the workspace migrations applied
//!   (feature: "postgres")
//! - `TestDataBuilder`: deterministic names, emails and ids that pass the
//!   domain validation rules
//! - `assertions`: small assertion helpers
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_postgres_test");
//!
//!     let name = builder.name("store", "main");
//!     let email = builder.email("owner");
//! }
//! ```

use uuid::Uuid;

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Password that satisfies the complexity rule (8-16 chars, an uppercase
/// letter, one of `!@#$%^&*`).
pub const VALID_PASSWORD: &str = "Secret#Pass1";

/// Deterministic test data keyed by a seed.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test name so each test gets its own, stable data.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_submit_rating");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    pub fn user_id(&self) -> Uuid {
        let bytes = self.seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        Uuid::from_bytes(uuid_bytes)
    }

    /// A display name between 20 and 60 characters.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let name = TestDataBuilder::new(7).name("store", "main");
    /// assert!((20..=60).contains(&name.chars().count()));
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        let mut name = format!("Test {} {} {:016x}", prefix, suffix, self.seed);
        name.truncate(60);
        name
    }

    /// A lower-case email unique per seed and label.
    pub fn email(&self, label: &str) -> String {
        format!("{}.{:x}@example.com", label.to_lowercase(), self.seed)
    }

    pub fn address(&self) -> String {
        format!("{} Test Street, Springfield", self.seed % 1000)
    }
}

/// Test assertion helpers
pub mod assertions {
    use uuid::Uuid;

    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}
