// HTTP handlers for review endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};

use crate::error::ApiError;
use crate::models::ItemKind;
use crate::reviews::{AddReviewRequest, RatingCalculator, RatingSummary, Review, ReviewService};

/// Shared state of the review routes
#[derive(Clone)]
pub struct ReviewState {
    pub reviews: ReviewService,
    pub ratings: RatingCalculator,
}

/// Routes mounted under `/api/reviews`
pub fn routes(state: ReviewState) -> Router {
    Router::new()
        .route("/:kind/:item_id", get(list_reviews).post(add_review))
        .route("/:kind/:item_id/rating", get(average_rating))
        .route("/:kind/:item_id/users/:user_id", delete(remove_review))
        .with_state(state)
}

/// Post a review
/// POST /api/reviews/{kind}/{item_id}
#[utoipa::path(
    post,
    path = "/api/reviews/{kind}/{item_id}",
    params(
        ("kind" = ItemKind, Path, description = "movies or books"),
        ("item_id" = i32, Path, description = "Movie or book ID")
    ),
    request_body = AddReviewRequest,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Rating outside 1..=10"),
        (status = 404, description = "User or item not found"),
        (status = 409, description = "User already reviewed this item")
    ),
    tag = "reviews"
)]
pub async fn add_review(
    State(state): State<ReviewState>,
    Path((kind, item_id)): Path<(ItemKind, i32)>,
    Json(request): Json<AddReviewRequest>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    tracing::debug!("Posting review for {} {} by user {}", kind.label(), item_id, request.user_id);

    let review = state
        .reviews
        .add_review(kind, item_id, request.user_id, request.rating, request.review)
        .await?;

    Ok((StatusCode::CREATED, Json(review)))
}

/// Get all reviews for an item
/// GET /api/reviews/{kind}/{item_id}
#[utoipa::path(
    get,
    path = "/api/reviews/{kind}/{item_id}",
    params(
        ("kind" = ItemKind, Path, description = "movies or books"),
        ("item_id" = i32, Path, description = "Movie or book ID")
    ),
    responses((status = 200, description = "Reviews, oldest first", body = Vec<Review>)),
    tag = "reviews"
)]
pub async fn list_reviews(
    State(state): State<ReviewState>,
    Path((kind, item_id)): Path<(ItemKind, i32)>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let reviews = state.reviews.list_reviews(kind, item_id).await?;
    Ok(Json(reviews))
}

/// Delete a user's review of an item
/// DELETE /api/reviews/{kind}/{item_id}/users/{user_id}
#[utoipa::path(
    delete,
    path = "/api/reviews/{kind}/{item_id}/users/{user_id}",
    params(
        ("kind" = ItemKind, Path, description = "movies or books"),
        ("item_id" = i32, Path, description = "Movie or book ID"),
        ("user_id" = i32, Path, description = "Author of the review")
    ),
    responses(
        (status = 200, description = "Deleted review", body = Review),
        (status = 404, description = "No such review")
    ),
    tag = "reviews"
)]
pub async fn remove_review(
    State(state): State<ReviewState>,
    Path((kind, item_id, user_id)): Path<(ItemKind, i32, i32)>,
) -> Result<Json<Review>, ApiError> {
    state
        .reviews
        .remove_review(kind, item_id, user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound {
            resource: "Review".to_string(),
            id: format!("{}/{}", item_id, user_id),
        })
}

/// Average rating of an item
/// GET /api/reviews/{kind}/{item_id}/rating
#[utoipa::path(
    get,
    path = "/api/reviews/{kind}/{item_id}/rating",
    params(
        ("kind" = ItemKind, Path, description = "movies or books"),
        ("item_id" = i32, Path, description = "Movie or book ID")
    ),
    responses(
        (status = 200, description = "Current average rating", body = RatingSummary),
        (status = 404, description = "Item not found")
    ),
    tag = "reviews"
)]
pub async fn average_rating(
    State(state): State<ReviewState>,
    Path((kind, item_id)): Path<(ItemKind, i32)>,
) -> Result<Json<RatingSummary>, ApiError> {
    let summary = state.ratings.average_rating(kind, item_id).await?;
    Ok(Json(summary))
}
