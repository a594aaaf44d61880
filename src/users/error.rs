// Authentication and user management error types

use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// Errors raised by registration, login, token handling and user management
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Validation error")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Missing authentication token")]
    MissingToken,

    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("User with id {0} not found")]
    UserNotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error")]
    PasswordHash,

    #[error("Token generation error: {0}")]
    TokenGeneration(String),
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Validation(errors) => ApiError::ValidationError(errors),
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::MissingToken => ApiError::Unauthorized(error.to_string()),
            AuthError::EmailAlreadyExists => ApiError::Conflict {
                message: error.to_string(),
            },
            AuthError::UserNotFound(id) => ApiError::NotFound {
                resource: "User".to_string(),
                id: id.to_string(),
            },
            AuthError::Database(e) => ApiError::DatabaseError(e),
            AuthError::PasswordHash | AuthError::TokenGeneration(_) => {
                ApiError::InternalError(error.to_string())
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_auth_error_status_codes() {
        let cases = [
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::ExpiredToken, StatusCode::UNAUTHORIZED),
            (AuthError::MissingToken, StatusCode::UNAUTHORIZED),
            (AuthError::EmailAlreadyExists, StatusCode::CONFLICT),
            (AuthError::UserNotFound(3), StatusCode::NOT_FOUND),
            (AuthError::PasswordHash, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).status_code(), expected);
        }
    }

    #[test]
    fn test_duplicate_email_message() {
        match ApiError::from(AuthError::EmailAlreadyExists) {
            ApiError::Conflict { message } => assert_eq!(message, "Email already registered"),
            other => panic!("Expected Conflict, got {:?}", other),
        }
    }
}
