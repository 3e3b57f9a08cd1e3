use axum_helpers::FieldOrder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::access::Role;

/// Account record. Never serialized as-is: the hash stays server-side.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub address: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// `email` is expected to be normalized already.
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        address: String,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            email,
            password_hash,
            address,
            role,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Admin-facing user projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            address: user.address,
            role: user.role,
        }
    }
}

/// User part of a login or registration response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthUser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(custom(function = "crate::validation::validate_name"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "crate::validation::validate_email"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "crate::validation::validate_password"))]
    pub password: String,
    #[serde(default)]
    #[validate(custom(function = "crate::validation::validate_address"))]
    pub address: String,
}

impl FieldOrder for RegisterRequest {
    const FIELD_ORDER: &'static [&'static str] = &["name", "email", "password", "address"];
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(custom(function = "crate::validation::validate_email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl FieldOrder for LoginRequest {
    const FIELD_ORDER: &'static [&'static str] = &["email", "password"];
}

/// Admin-created account. `role` defaults to `user`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(custom(function = "crate::validation::validate_name"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "crate::validation::validate_email"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "crate::validation::validate_password"))]
    pub password: String,
    #[serde(default)]
    #[validate(custom(function = "crate::validation::validate_address"))]
    pub address: String,
    #[validate(custom(function = "crate::validation::validate_role"))]
    #[schema(value_type = Option<Role>)]
    pub role: Option<String>,
}

impl FieldOrder for CreateUserRequest {
    const FIELD_ORDER: &'static [&'static str] = &["name", "email", "password", "address", "role"];
}

impl CreateUserRequest {
    pub fn role(&self) -> Option<Role> {
        match &self.role {
            Some(role) => role.parse().ok(),
            None => Some(Role::default()),
        }
    }
}

/// The new password is checked only after the current one matches.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

impl FieldOrder for ChangePasswordRequest {}

/// Sort direction accepted as `ASC`/`DESC` in any letter case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        SortOrder::from_str(&raw).map_err(|_| {
            serde::de::Error::custom(format!("order must be ASC or DESC, got `{raw}`"))
        })
    }
}

impl SortOrder {
    /// Apply this direction to an ascending comparison.
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserSortField {
    #[default]
    Name,
    Email,
    Address,
    Role,
}

/// Query filters for the admin user list
///
/// String filters are case-insensitive substring matches; `role` is exact.
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[serde(default, rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub role: Option<Role>,
    pub sort_by: Option<UserSortField>,
    pub order: Option<SortOrder>,
}

impl FieldOrder for UserFilter {}

/// A filter value worth applying: present and not blank.
pub fn filter_term(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Case-insensitive substring match used by the in-memory repositories.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        filter_term(&self.name).is_none_or(|t| contains_ignore_case(&user.name, t))
            && filter_term(&self.email).is_none_or(|t| contains_ignore_case(&user.email, t))
            && filter_term(&self.address).is_none_or(|t| contains_ignore_case(&user.address, t))
            && self.role.is_none_or(|r| r == user.role)
    }

    pub fn compare(&self, a: &User, b: &User) -> std::cmp::Ordering {
        let ordering = match self.sort_by.unwrap_or_default() {
            UserSortField::Name => a.name.cmp(&b.name),
            UserSortField::Email => a.email.cmp(&b.email),
            UserSortField::Address => a.address.cmp(&b.address),
            // Declaration order, which is also the order of the PostgreSQL enum
            UserSortField::Role => a.role.cmp(&b.role),
        };
        self.order.unwrap_or_default().apply(ordering)
    }
}

/// Seed values for the bootstrap administrator.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_is_case_insensitive() {
        let order: SortOrder = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(order, SortOrder::Desc);
        let order: SortOrder = serde_json::from_str("\"ASC\"").unwrap();
        assert_eq!(order, SortOrder::Asc);
        assert!(serde_json::from_str::<SortOrder>("\"sideways\"").is_err());
    }

    #[test]
    fn test_create_user_role_defaults_to_user() {
        let input: CreateUserRequest = serde_json::from_str(
            r#"{"name":"A","email":"a@example.com","password":"x","address":"y"}"#,
        )
        .unwrap();
        assert_eq!(input.role(), Some(Role::User));
    }

    #[test]
    fn test_filter_ignores_blank_terms() {
        let user = User::new(
            "Alexandra Montgomery Smith".into(),
            "alex@example.com".into(),
            "hash".into(),
            "12 Harbour Road".into(),
            Role::User,
        );

        let filter = UserFilter {
            name: Some("  ".into()),
            email: Some("ALEX@".into()),
            ..Default::default()
        };
        assert!(filter.matches(&user));

        let filter = UserFilter {
            role: Some(Role::Admin),
            ..Default::default()
        };
        assert!(!filter.matches(&user));
    }

    #[test]
    fn test_user_response_hides_hash() {
        let user = User::new(
            "Alexandra Montgomery Smith".into(),
            "alex@example.com".into(),
            "$argon2id$secret".into(),
            "12 Harbour Road".into(),
            Role::StoreOwner,
        );
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "store-owner");
    }
}
