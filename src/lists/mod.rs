// Watchlist (movies) and readlist (books) membership

pub mod handlers;
pub mod models;
pub mod service;

pub use handlers::routes;
pub use models::*;
pub use service::MembershipService;
