// User service - registration, login and profile management

use axum::extract::FromRef;
use validator::Validate;

use crate::users::{
    error::AuthError,
    models::{AuthResponse, LoginRequest, RegisterRequest, UpdateUserRequest, UserResponse},
    password::PasswordService,
    repository::UserRepository,
    token::TokenService,
};

/// Authentication service coordinating user operations
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    tokens: TokenService,
}

impl FromRef<AuthService> for TokenService {
    fn from_ref(service: &AuthService) -> Self {
        service.tokens.clone()
    }
}

impl AuthService {
    pub fn new(users: UserRepository, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Register a new user
    ///
    /// The email is stored lowercased; the unique index on `users.email`
    /// rejects a second registration with `EmailAlreadyExists`.
    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse, AuthError> {
        let request = request.normalized();
        request.validate()?;

        let email = request.email;
        let password_hash = PasswordService::hash_password(&request.password)?;
        let user = self
            .users
            .create_user(&request.username, &email, &password_hash)
            .await
            .map_err(|e| {
                if matches!(e, AuthError::EmailAlreadyExists) {
                    tracing::warn!("Registration attempt with existing email: {}", email);
                }
                e
            })?;

        tracing::info!("Registered user {} ({})", user.id, user.email);
        Ok(user.into())
    }

    /// Login a user, returning a token and the user's profile
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        request.validate()?;

        let Some(user) = self.users.find_by_email(request.email.trim()).await? else {
            tracing::warn!("Login attempt for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !PasswordService::verify_password(&request.password, &user.password_hash)? {
            tracing::warn!("Failed login for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.generate_token(user.id, &user.email)?;
        tracing::info!("User {} logged in", user.id);

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    pub async fn get_user(&self, user_id: i32) -> Result<UserResponse, AuthError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(UserResponse::from)
            .ok_or(AuthError::UserNotFound(user_id))
    }

    pub async fn list_users(&self) -> Result<Vec<UserResponse>, AuthError> {
        let users = self.users.list().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn update_user(
        &self,
        user_id: i32,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, AuthError> {
        let request = request.normalized();
        request.validate()?;

        let user = self
            .users
            .update(user_id, request.username.as_deref(), request.email.as_deref())
            .await?
            .ok_or(AuthError::UserNotFound(user_id))?;

        tracing::info!("Updated user {}", user_id);
        Ok(user.into())
    }

    pub async fn delete_user(&self, user_id: i32) -> Result<(), AuthError> {
        if !self.users.delete(user_id).await? {
            return Err(AuthError::UserNotFound(user_id));
        }

        tracing::info!("Deleted user {}", user_id);
        Ok(())
    }
}
