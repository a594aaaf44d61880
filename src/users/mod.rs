// User accounts and JWT authentication

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

pub use error::AuthError;
pub use handlers::routes;
pub use middleware::AuthenticatedUser;
pub use models::{AuthResponse, LoginRequest, RegisterRequest, UpdateUserRequest, User, UserResponse};
pub use repository::UserRepository;
pub use service::AuthService;
pub use token::TokenService;
