// HTTP handlers for the movie and book catalogue

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use super::models::{Book, BookView, CreateBook, CreateMovie, Movie, MovieView, RatedRow, UpdateBook, UpdateMovie};
use super::query::{SearchParams, ValidatedSearch};
use super::repository::CatalogRepository;
use crate::error::ApiError;
use crate::models::ItemKind;
use crate::reviews::RatingFallback;

/// Application state shared across catalogue handlers
#[derive(Clone)]
pub struct CatalogState {
    pub repo: CatalogRepository,
    pub fallback: RatingFallback,
}

/// Routes mounted under `/api/movies`
pub fn movie_routes(state: CatalogState) -> Router {
    Router::new()
        .route("/", get(list_movies).post(create_movie))
        .route("/search", get(search_movies))
        .route("/:id", get(get_movie).put(update_movie).delete(delete_movie))
        .with_state(state)
}

/// Routes mounted under `/api/books`
pub fn book_routes(state: CatalogState) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/search", get(search_books))
        .route("/:id", get(get_book).put(update_book).delete(delete_book))
        .with_state(state)
}

fn not_found(kind: ItemKind, id: i32) -> ApiError {
    tracing::debug!("{} with id {} not found", kind.label(), id);
    ApiError::NotFound {
        resource: kind.label().to_string(),
        id: id.to_string(),
    }
}

fn unrated<T>(item: T) -> RatedRow<T> {
    RatedRow {
        item,
        review_average: None,
        review_count: 0,
    }
}

// ============================================================================
// Movies
// ============================================================================

/// Handler for POST /api/movies
#[utoipa::path(
    post,
    path = "/api/movies",
    request_body = CreateMovie,
    responses(
        (status = 201, description = "Movie created successfully", body = Movie),
        (status = 400, description = "Invalid input data")
    ),
    tag = "movies"
)]
pub async fn create_movie(
    State(state): State<CatalogState>,
    Json(payload): Json<CreateMovie>,
) -> Result<(StatusCode, Json<MovieView>), ApiError> {
    tracing::debug!("Creating new movie: {}", payload.title);
    payload.validate()?;

    let movie = state.repo.create_movie(payload).await?;

    tracing::info!("Successfully created movie with id: {}", movie.id);
    Ok((StatusCode::CREATED, Json(unrated(movie).into_view(state.fallback))))
}

/// Handler for GET /api/movies
#[utoipa::path(
    get,
    path = "/api/movies",
    responses((status = 200, description = "All movies with their average rating", body = Vec<Movie>)),
    tag = "movies"
)]
pub async fn list_movies(State(state): State<CatalogState>) -> Result<Json<Vec<MovieView>>, ApiError> {
    let rows = state.repo.list_movies().await?;
    tracing::debug!("Retrieved {} movies", rows.len());
    Ok(Json(rows.into_iter().map(|row| row.into_view(state.fallback)).collect()))
}

/// Handler for GET /api/movies/search
#[utoipa::path(
    get,
    path = "/api/movies/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Movies matching the filters", body = Vec<Movie>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "movies"
)]
pub async fn search_movies(
    State(state): State<CatalogState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<MovieView>>, ApiError> {
    tracing::debug!("Searching movies with query parameters: {:?}", params);

    let validated = ValidatedSearch::parse(ItemKind::Movie, params).map_err(ApiError::BadRequest)?;
    let rows: Vec<RatedRow<Movie>> = state.repo.search(validated.into_builder(ItemKind::Movie)).await?;

    tracing::debug!("Query returned {} movies", rows.len());
    Ok(Json(rows.into_iter().map(|row| row.into_view(state.fallback)).collect()))
}

/// Handler for GET /api/movies/:id
#[utoipa::path(
    get,
    path = "/api/movies/{id}",
    params(("id" = i32, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Movie found", body = Movie),
        (status = 404, description = "Movie not found")
    ),
    tag = "movies"
)]
pub async fn get_movie(
    State(state): State<CatalogState>,
    Path(id): Path<i32>,
) -> Result<Json<MovieView>, ApiError> {
    let row = state
        .repo
        .find_movie(id)
        .await?
        .ok_or_else(|| not_found(ItemKind::Movie, id))?;
    Ok(Json(row.into_view(state.fallback)))
}

/// Handler for PUT /api/movies/:id
#[utoipa::path(
    put,
    path = "/api/movies/{id}",
    params(("id" = i32, Path, description = "Movie ID")),
    request_body = UpdateMovie,
    responses(
        (status = 200, description = "Movie updated successfully", body = Movie),
        (status = 400, description = "Invalid input data"),
        (status = 404, description = "Movie not found")
    ),
    tag = "movies"
)]
pub async fn update_movie(
    State(state): State<CatalogState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateMovie>,
) -> Result<Json<Movie>, ApiError> {
    tracing::debug!("Updating movie with id: {}", id);
    payload.validate()?;

    let movie = state
        .repo
        .update_movie(id, payload)
        .await?
        .ok_or_else(|| not_found(ItemKind::Movie, id))?;

    tracing::info!("Successfully updated movie with id: {}", id);
    Ok(Json(movie))
}

/// Handler for DELETE /api/movies/:id
#[utoipa::path(
    delete,
    path = "/api/movies/{id}",
    params(("id" = i32, Path, description = "Movie ID")),
    responses(
        (status = 204, description = "Movie deleted successfully"),
        (status = 404, description = "Movie not found")
    ),
    tag = "movies"
)]
pub async fn delete_movie(
    State(state): State<CatalogState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    if !state.repo.delete_movie(id).await? {
        return Err(not_found(ItemKind::Movie, id));
    }

    tracing::info!("Successfully deleted movie with id: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Books
// ============================================================================

/// Handler for POST /api/books
#[utoipa::path(
    post,
    path = "/api/books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created successfully", body = Book),
        (status = 400, description = "Invalid input data")
    ),
    tag = "books"
)]
pub async fn create_book(
    State(state): State<CatalogState>,
    Json(payload): Json<CreateBook>,
) -> Result<(StatusCode, Json<BookView>), ApiError> {
    tracing::debug!("Creating new book: {}", payload.title);
    payload.validate()?;

    let book = state.repo.create_book(payload).await?;

    tracing::info!("Successfully created book with id: {}", book.id);
    Ok((StatusCode::CREATED, Json(unrated(book).into_view(state.fallback))))
}

/// Handler for GET /api/books
#[utoipa::path(
    get,
    path = "/api/books",
    responses((status = 200, description = "All books with their average rating", body = Vec<Book>)),
    tag = "books"
)]
pub async fn list_books(State(state): State<CatalogState>) -> Result<Json<Vec<BookView>>, ApiError> {
    let rows = state.repo.list_books().await?;
    tracing::debug!("Retrieved {} books", rows.len());
    Ok(Json(rows.into_iter().map(|row| row.into_view(state.fallback)).collect()))
}

/// Handler for GET /api/books/search
#[utoipa::path(
    get,
    path = "/api/books/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Books matching the filters", body = Vec<Book>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "books"
)]
pub async fn search_books(
    State(state): State<CatalogState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<BookView>>, ApiError> {
    tracing::debug!("Searching books with query parameters: {:?}", params);

    let validated = ValidatedSearch::parse(ItemKind::Book, params).map_err(ApiError::BadRequest)?;
    let rows: Vec<RatedRow<Book>> = state.repo.search(validated.into_builder(ItemKind::Book)).await?;

    tracing::debug!("Query returned {} books", rows.len());
    Ok(Json(rows.into_iter().map(|row| row.into_view(state.fallback)).collect()))
}

/// Handler for GET /api/books/:id
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book found", body = Book),
        (status = 404, description = "Book not found")
    ),
    tag = "books"
)]
pub async fn get_book(
    State(state): State<CatalogState>,
    Path(id): Path<i32>,
) -> Result<Json<BookView>, ApiError> {
    let row = state
        .repo
        .find_book(id)
        .await?
        .ok_or_else(|| not_found(ItemKind::Book, id))?;
    Ok(Json(row.into_view(state.fallback)))
}

/// Handler for PUT /api/books/:id
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated successfully", body = Book),
        (status = 400, description = "Invalid input data"),
        (status = 404, description = "Book not found")
    ),
    tag = "books"
)]
pub async fn update_book(
    State(state): State<CatalogState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateBook>,
) -> Result<Json<Book>, ApiError> {
    tracing::debug!("Updating book with id: {}", id);
    payload.validate()?;

    let book = state
        .repo
        .update_book(id, payload)
        .await?
        .ok_or_else(|| not_found(ItemKind::Book, id))?;

    tracing::info!("Successfully updated book with id: {}", id);
    Ok(Json(book))
}

/// Handler for DELETE /api/books/:id
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted successfully"),
        (status = 404, description = "Book not found")
    ),
    tag = "books"
)]
pub async fn delete_book(
    State(state): State<CatalogState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    if !state.repo.delete_book(id).await? {
        return Err(not_found(ItemKind::Book, id));
    }

    tracing::info!("Successfully deleted book with id: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
