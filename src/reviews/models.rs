use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Domain model representing a review in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Review {
    pub id: i32,
    pub user_id: i32,
    pub item_id: i32,
    #[schema(example = 8.5, minimum = 1.0, maximum = 10.0)]
    pub rating: f64,
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated review ready to be inserted
#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: i32,
    pub item_id: i32,
    pub rating: f64,
    pub review: Option<String>,
}

/// Raw aggregate over an item's reviews
#[derive(Debug, Clone, Copy, PartialEq, FromRow)]
pub struct RatingStats {
    /// `AVG(rating)`, null when the item has no reviews
    pub average: Option<f64>,
    pub review_count: i64,
}

/// Derived rating of an item as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RatingSummary {
    pub item_id: i32,
    pub average_rating: f64,
    pub review_count: i64,
    /// False when `average_rating` comes from the fallback policy
    pub from_reviews: bool,
}

/// Request DTO for posting a review
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddReviewRequest {
    #[serde(alias = "userId")]
    pub user_id: i32,
    #[schema(example = 8.0, minimum = 1.0, maximum = 10.0)]
    pub rating: f64,
    #[serde(default, alias = "text")]
    pub review: Option<String>,
}
