pub mod handlers;
pub mod models;
pub mod rating_calculator;
pub mod service;

pub use handlers::{routes, ReviewState};
pub use models::*;
pub use rating_calculator::*;
pub use service::*;
