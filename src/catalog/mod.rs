// Movie and book catalogue: CRUD, search and derived ratings

pub mod handlers;
pub mod models;
pub mod query;
pub mod repository;

pub use handlers::{book_routes, movie_routes, CatalogState};
pub use models::*;
pub use repository::CatalogRepository;
