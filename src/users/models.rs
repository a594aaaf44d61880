// User data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::validate_password_strength;

/// User database model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User response model (excludes password_hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    #[schema(example = "ripley")]
    pub username: String,
    #[schema(example = "ripley@nostromo.space")]
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Registration request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    /// At least 8 of `A-Za-z0-9!@#$%^&*`, with one letter and one digit
    #[validate(custom = "validate_password_strength")]
    pub password: String,
}

impl RegisterRequest {
    /// Trim the username and email and lowercase the email
    pub fn normalized(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password: self.password,
        }
    }
}

/// Login request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Partial profile update
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

impl UpdateUserRequest {
    pub fn normalized(self) -> Self {
        Self {
            username: self.username.map(|u| u.trim().to_string()),
            email: self.email.map(|e| e.trim().to_lowercase()),
        }
    }
}

/// Authentication response DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_register_request_validation() {
        assert!(register("ripley", "ripley@nostromo.space", "alien1979").validate().is_ok());

        assert!(register("", "ripley@nostromo.space", "alien1979").validate().is_err());
        assert!(register(&"r".repeat(51), "ripley@nostromo.space", "alien1979").validate().is_err());
        assert!(register("ripley", "not-an-email", "alien1979").validate().is_err());
        assert!(register("ripley", "ripley@nostromo.space", "short1").validate().is_err());
        assert!(register("ripley", "ripley@nostromo.space", "lettersonly").validate().is_err());
        assert!(register("ripley", "ripley@nostromo.space", "12345678").validate().is_err());
    }

    #[test]
    fn test_blank_username_rejected_after_normalizing() {
        let request = register("   ", "ripley@nostromo.space", "alien1979").normalized();
        assert_eq!(request.username, "");
        assert!(request.validate().is_err());

        let request = register("  ripley ", " Ripley@Nostromo.SPACE ", "alien1979").normalized();
        assert_eq!(request.username, "ripley");
        assert_eq!(request.email, "ripley@nostromo.space");
        assert!(request.validate().is_ok());

        let update = UpdateUserRequest {
            username: Some("\t ".to_string()),
            email: None,
        }
        .normalized();
        assert_eq!(update.username.as_deref(), Some(""));
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_user_response_hides_password_hash() {
        let user = User {
            id: 1,
            username: "ripley".to_string(),
            email: "ripley@nostromo.space".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(json.contains("\"username\":\"ripley\""));
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn test_update_user_request_is_partial() {
        assert!(UpdateUserRequest::default().validate().is_ok());

        let bad_email = UpdateUserRequest {
            email: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(bad_email.validate().is_err());
    }
}
