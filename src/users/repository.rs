// Database repository for users

use sqlx::PgPool;

use crate::users::{error::AuthError, models::User};

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at";

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_write_error(error: sqlx::Error) -> AuthError {
        if crate::db::is_unique_violation(&error) {
            AuthError::EmailAlreadyExists
        } else {
            AuthError::Database(error)
        }
    }

    /// Create a new user; a taken email fails with `EmailAlreadyExists`
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AuthError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::map_write_error)
    }

    /// Find a user by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<User>, AuthError> {
        let users = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    /// Update username and/or email; None fields keep their value
    pub async fn update(
        &self,
        id: i32,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, AuthError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET username = COALESCE($1, username), email = COALESCE($2, email) \
             WHERE id = $3 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(username)
        .bind(email)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::map_write_error)
    }

    /// Delete a user and, through cascading keys, their lists and reviews
    pub async fn delete(&self, id: i32) -> Result<bool, AuthError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
