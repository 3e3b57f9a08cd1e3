use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum_helpers::{FieldOrder, JwtAuth};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::access::Role;
use crate::error::{UserError, UserResult};
use crate::models::{
    AdminSeed, AuthResponse, AuthUser, ChangePasswordRequest, CreateUserRequest, LoginRequest,
    RegisterRequest, User, UserFilter, UserResponse,
};
use crate::repository::UserRepository;
use crate::validation::{self, PASSWORD_MESSAGE, normalize_email};

/// Argon2id hash (default parameters) of a password nobody knows. Verified
/// against when the login email is unknown so both failures cost the same.
const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$sttRr7smZMYEcEDkv1q8YQ$BKsY6aXKiObNn1ktZuuhDf8S9u0kM+eTwGqieiKSfPg";

/// Service layer for User business logic
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    jwt: JwtAuth,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            jwt: self.jwt.clone(),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R, jwt: JwtAuth) -> Self {
        Self {
            repository: Arc::new(repository),
            jwt,
        }
    }

    /// Self-service sign-up. Always creates a `user`.
    pub async fn register(&self, input: RegisterRequest) -> UserResult<AuthResponse> {
        let user = self
            .insert(input.name, input.email, &input.password, input.address, Role::User)
            .await?;
        self.issue(&user)
    }

    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, input: LoginRequest) -> UserResult<AuthResponse> {
        let Some(user) = self
            .repository
            .get_by_email(&normalize_email(&input.email))
            .await?
        else {
            self.verify_password(&input.password, DUMMY_PASSWORD_HASH)?;
            tracing::info!("Login rejected: unknown email");
            return Err(UserError::InvalidCredentials);
        };

        if !self.verify_password(&input.password, &user.password_hash)? {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(UserError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.issue(&user)
    }

    /// Admin-created account with an explicit role.
    pub async fn create_user(&self, input: CreateUserRequest) -> UserResult<UserResponse> {
        let role = input
            .role()
            .ok_or_else(|| UserError::Validation(validation::ROLE_MESSAGE.to_string()))?;

        let user = self
            .insert(input.name, input.email, &input.password, input.address, role)
            .await?;
        Ok(user.into())
    }

    pub async fn list_users(&self, filter: UserFilter) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.list(filter).await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    pub async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// The current password is checked before the new one is validated.
    pub async fn change_password(&self, id: Uuid, input: ChangePasswordRequest) -> UserResult<()> {
        let user = self.get_user(id).await?;

        if !self.verify_password(&input.current_password, &user.password_hash)? {
            return Err(UserError::IncorrectPassword);
        }

        if !validation::is_strong_password(&input.new_password) {
            return Err(UserError::Validation(PASSWORD_MESSAGE.to_string()));
        }

        let hash = self.hash_password(&input.new_password)?;
        self.repository.update_password(id, hash).await
    }

    /// Create the bootstrap administrator unless the email is already taken.
    ///
    /// Returns `true` if an account was created.
    pub async fn ensure_admin(&self, seed: AdminSeed) -> UserResult<bool> {
        let email = normalize_email(&seed.email);
        if self.repository.get_by_email(&email).await?.is_some() {
            tracing::debug!(%email, "Bootstrap admin already present");
            return Ok(false);
        }

        let request = RegisterRequest {
            name: seed.name,
            email,
            password: seed.password,
            address: seed.address,
        };
        request
            .validate()
            .map_err(|e| {
                UserError::Validation(axum_helpers::errors::ordered_validation_message(
                    &e,
                    RegisterRequest::FIELD_ORDER,
                ))
            })?;

        let user = self
            .insert(request.name, request.email, &request.password, request.address, Role::Admin)
            .await?;
        tracing::info!(user_id = %user.id, "Bootstrap admin created");
        Ok(true)
    }

    async fn insert(
        &self,
        name: String,
        email: String,
        password: &str,
        address: String,
        role: Role,
    ) -> UserResult<User> {
        let email = normalize_email(&email);
        if self.repository.get_by_email(&email).await?.is_some() {
            return Err(UserError::DuplicateEmail(email));
        }

        let password_hash = self.hash_password(password)?;
        let user = User::new(name, email, password_hash, address, role);
        self.repository.create(user).await
    }

    fn issue(&self, user: &User) -> UserResult<AuthResponse> {
        let token = self
            .jwt
            .create_token(user.id, &user.role.to_string())
            .map_err(|e| UserError::Token(e.to_string()))?;

        Ok(AuthResponse {
            token,
            user: AuthUser::from(user),
        })
    }

    // Password helpers

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryUserRepository, MockUserRepository};
    use axum_helpers::JwtConfig;

    const SECRET: &str = "service-test-secret-with-32-characters";
    const PASSWORD: &str = "Secret#Pass1";

    fn jwt() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new(SECRET))
    }

    fn service() -> UserService<InMemoryUserRepository> {
        UserService::new(InMemoryUserRepository::new(), jwt())
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Registered Customer Name".into(),
            email: email.into(),
            password: PASSWORD.into(),
            address: "42 Market Street".into(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login_yields_same_identity() {
        let service = service();

        let registered = service
            .register(register_request("Buyer@Example.com"))
            .await
            .unwrap();
        assert_eq!(registered.user.role, Role::User);
        assert_eq!(registered.user.email, "buyer@example.com");

        let logged_in = service
            .login(LoginRequest {
                email: "buyer@example.com".into(),
                password: PASSWORD.into(),
            })
            .await
            .unwrap();

        let claims = jwt().verify_token(&logged_in.token).unwrap();
        assert_eq!(claims.user_id().unwrap(), registered.user.id);
        assert_eq!(claims.role, "user");
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_rejected() {
        let service = service();
        service.register(register_request("dup@example.com")).await.unwrap();

        let result = service.register(register_request("DUP@example.com ")).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
        assert_eq!(service.list_users(UserFilter::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let service = service();
        service.register(register_request("known@example.com")).await.unwrap();

        let wrong_password = service
            .login(LoginRequest {
                email: "known@example.com".into(),
                password: "Wrong#Pass1".into(),
            })
            .await
            .unwrap_err();
        let unknown_email = service
            .login(LoginRequest {
                email: "nobody@example.com".into(),
                password: PASSWORD.into(),
            })
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, UserError::InvalidCredentials));
        assert!(matches!(unknown_email, UserError::InvalidCredentials));
    }

    #[test]
    fn test_unknown_email_hash_verifies_as_mismatch() {
        let service = service();
        assert!(!service.verify_password(PASSWORD, DUMMY_PASSWORD_HASH).unwrap());
        assert!(!service.verify_password("", DUMMY_PASSWORD_HASH).unwrap());
    }

    #[tokio::test]
    async fn test_change_password_checks_current_first() {
        let service = service();
        let user = service.register(register_request("pw@example.com")).await.unwrap().user;

        let result = service
            .change_password(
                user.id,
                ChangePasswordRequest {
                    current_password: "Wrong#Pass1".into(),
                    new_password: "weak".into(),
                },
            )
            .await;
        assert!(matches!(result, Err(UserError::IncorrectPassword)));

        let result = service
            .change_password(
                user.id,
                ChangePasswordRequest {
                    current_password: PASSWORD.into(),
                    new_password: "weak".into(),
                },
            )
            .await;
        assert!(matches!(result, Err(UserError::Validation(msg)) if msg == PASSWORD_MESSAGE));

        service
            .change_password(
                user.id,
                ChangePasswordRequest {
                    current_password: PASSWORD.into(),
                    new_password: "Fresh&Pass22".into(),
                },
            )
            .await
            .unwrap();

        let login = service
            .login(LoginRequest {
                email: "pw@example.com".into(),
                password: "Fresh&Pass22".into(),
            })
            .await;
        assert!(login.is_ok());
    }

    #[tokio::test]
    async fn test_create_user_with_role() {
        let service = service();
        let created = service
            .create_user(CreateUserRequest {
                name: "Corner Shop Owner Person".into(),
                email: "owner@example.com".into(),
                password: PASSWORD.into(),
                address: "7 High Street".into(),
                role: Some("store-owner".into()),
            })
            .await
            .unwrap();
        assert_eq!(created.role, Role::StoreOwner);
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() {
        let service = service();
        let seed = AdminSeed {
            name: "Platform Administrator Account".into(),
            email: "admin@example.com".into(),
            password: PASSWORD.into(),
            address: "1 Admin Way".into(),
        };

        assert!(service.ensure_admin(seed.clone()).await.unwrap());
        assert!(!service.ensure_admin(seed).await.unwrap());

        let admins = service
            .list_users(UserFilter {
                role: Some(Role::Admin),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(admins.len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_admin_rejects_weak_password() {
        let service = service();
        let result = service
            .ensure_admin(AdminSeed {
                name: "Platform Administrator Account".into(),
                email: "admin@example.com".into(),
                password: "admin".into(),
                address: "1 Admin Way".into(),
            })
            .await;
        assert!(matches!(result, Err(UserError::Validation(msg)) if msg == PASSWORD_MESSAGE));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut mock_repo = MockUserRepository::new();
        let id = Uuid::now_v7();

        mock_repo
            .expect_get_by_id()
            .with(mockall::predicate::eq(id))
            .returning(|_| Ok(None));

        let service = UserService::new(mock_repo, jwt());
        let result = service.get_user(id).await;
        assert!(matches!(result, Err(UserError::NotFound(missing)) if missing == id));
    }
}
