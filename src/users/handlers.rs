// HTTP handlers for user endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::error::ApiError;
use crate::users::{
    middleware::AuthenticatedUser,
    models::{AuthResponse, LoginRequest, RegisterRequest, UpdateUserRequest, UserResponse},
    service::AuthService,
};

/// Routes mounted under `/api/users`
pub fn routes(service: AuthService) -> Router {
    Router::new()
        .route("/", get(list_users))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .with_state(service)
}

/// Register a new user
/// POST /api/users/register
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid username, email or password"),
        (status = 409, description = "Email already registered")
    ),
    tag = "users"
)]
pub async fn register(
    State(service): State<AuthService>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = service.register(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Login a user
/// POST /api/users/login
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = AuthResponse),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "users"
)]
pub async fn login(
    State(service): State<AuthService>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    Ok(Json(service.login(request).await?))
}

/// Get current user information
/// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing, invalid or expired token")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn me(
    State(service): State<AuthService>,
    user: AuthenticatedUser,
) -> Result<Json<UserResponse>, ApiError> {
    tracing::debug!("Resolving current user {}", user.user_id);
    Ok(Json(service.get_user(user.user_id).await?))
}

/// List users
/// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "All users", body = Vec<UserResponse>)),
    tag = "users"
)]
pub async fn list_users(State(service): State<AuthService>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    Ok(Json(service.list_users().await?))
}

/// GET /api/users/{id}
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(service): State<AuthService>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(service.get_user(id).await?))
}

/// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    ),
    tag = "users"
)]
pub async fn update_user(
    State(service): State<AuthService>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(service.update_user(id, request).await?))
}

/// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(service): State<AuthService>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
