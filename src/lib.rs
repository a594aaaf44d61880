pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod lists;
pub mod models;
pub mod reviews;
pub mod store;
pub mod users;
pub mod validation;

use std::sync::Arc;

use axum::{routing::get, Router};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use catalog::{CatalogRepository, CatalogState};
use config::AppConfig;
use lists::MembershipService;
use reviews::{RatingCalculator, ReviewService, ReviewState};
use store::PgStore;
use users::{AuthService, TokenService, UserRepository};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        lists::handlers::add_membership,
        lists::handlers::list_membership,
        lists::handlers::remove_membership,
        reviews::handlers::add_review,
        reviews::handlers::list_reviews,
        reviews::handlers::remove_review,
        reviews::handlers::average_rating,
        catalog::handlers::create_movie,
        catalog::handlers::list_movies,
        catalog::handlers::search_movies,
        catalog::handlers::get_movie,
        catalog::handlers::update_movie,
        catalog::handlers::delete_movie,
        catalog::handlers::create_book,
        catalog::handlers::list_books,
        catalog::handlers::search_books,
        catalog::handlers::get_book,
        catalog::handlers::update_book,
        catalog::handlers::delete_book,
        users::handlers::register,
        users::handlers::login,
        users::handlers::me,
        users::handlers::list_users,
        users::handlers::get_user,
        users::handlers::update_user,
        users::handlers::delete_user,
    ),
    components(schemas(
        models::ItemKind,
        lists::Membership,
        lists::ListedItem,
        lists::AddMembershipRequest,
        reviews::Review,
        reviews::RatingSummary,
        reviews::AddReviewRequest,
        catalog::Movie,
        catalog::CreateMovie,
        catalog::UpdateMovie,
        catalog::Book,
        catalog::CreateBook,
        catalog::UpdateBook,
        users::UserResponse,
        users::RegisterRequest,
        users::LoginRequest,
        users::UpdateUserRequest,
        users::AuthResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "lists", description = "Watchlists and readlists"),
        (name = "reviews", description = "Reviews and average ratings"),
        (name = "movies", description = "Movie catalogue"),
        (name = "books", description = "Book catalogue"),
        (name = "users", description = "Accounts and authentication")
    ),
    info(
        title = "Listory API",
        version = "0.1.0",
        description = "Movie and book catalogue with watchlists, readlists, reviews and ratings"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Creates and configures the application router
///
/// Every service receives its store handle here; nothing reaches for a
/// global connection.
pub fn create_router(pool: PgPool, config: &AppConfig) -> Router {
    let store = Arc::new(PgStore::new(pool.clone()));

    let memberships = MembershipService::new(store.clone(), config.rating_fallback);
    let reviews = ReviewState {
        reviews: ReviewService::new(store.clone()),
        ratings: RatingCalculator::new(store, config.rating_fallback),
    };
    let catalog = CatalogState {
        repo: CatalogRepository::new(pool.clone()),
        fallback: config.rating_fallback,
    };
    let auth = AuthService::new(
        UserRepository::new(pool),
        TokenService::new(config.jwt_secret.clone(), config.jwt_ttl_secs),
    );

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(|| async { "Listory API is running!" }))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/list", lists::routes(memberships))
        .nest("/api/reviews", reviews::routes(reviews))
        .nest("/api/movies", catalog::movie_routes(catalog.clone()))
        .nest("/api/books", catalog::book_routes(catalog))
        .nest("/api/users", users::routes(auth))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}
