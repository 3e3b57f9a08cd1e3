//! Field rules shared by every request that carries a name, email,
//! password or address. Stores reuse the name, email and address rules.
//!
//! Each function is usable as a `validator` custom rule:
//!
//! ```rust,ignore
//! #[derive(Deserialize, Validate)]
//! struct CreateStore {
//!     #[validate(custom(function = "domain_users::validation::validate_name"))]
//!     name: String,
//! }
//! ```

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::{ValidateEmail, ValidationError};

pub const NAME_MIN: usize = 20;
pub const NAME_MAX: usize = 60;
pub const ADDRESS_MAX: usize = 400;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 16;

pub const PASSWORD_MESSAGE: &str =
    "Password must be 8-16 chars, with at least one uppercase and one special character";
pub const ROLE_MESSAGE: &str = "Role must be admin, user, or store-owner";
pub const RATING_MESSAGE: &str = "Rating must be 1-5";

static UPPERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]").unwrap());
static SPECIAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[!@#$%^&*]").unwrap());

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if name.trim().is_empty() {
        return Err(failure("required", "Name is required"));
    }
    if len < NAME_MIN {
        return Err(failure("name_min", "Name must be at least 20 characters long"));
    }
    if len > NAME_MAX {
        return Err(failure("name_max", "Name cannot exceed 60 characters"));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(failure("required", "Email is required"));
    }
    if !email.trim().validate_email() {
        return Err(failure("email", "Please provide a valid email address"));
    }
    Ok(())
}

/// 8-16 characters, at least one ASCII uppercase letter and one of `!@#$%^&*`.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(failure("required", "Password is required"));
    }
    if !is_strong_password(password) {
        return Err(failure("password", PASSWORD_MESSAGE));
    }
    Ok(())
}

pub fn is_strong_password(password: &str) -> bool {
    let len = password.chars().count();
    (PASSWORD_MIN..=PASSWORD_MAX).contains(&len)
        && UPPERCASE.is_match(password)
        && SPECIAL.is_match(password)
}

pub fn validate_address(address: &str) -> Result<(), ValidationError> {
    if address.trim().is_empty() {
        return Err(failure("required", "Address is required"));
    }
    if address.chars().count() > ADDRESS_MAX {
        return Err(failure("address_max", "Address cannot exceed 400 characters"));
    }
    Ok(())
}

pub fn validate_role(role: &str) -> Result<(), ValidationError> {
    role.parse::<crate::access::Role>()
        .map(|_| ())
        .map_err(|_| failure("role", ROLE_MESSAGE))
}

/// Lower-cased, trimmed form used for storage and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
