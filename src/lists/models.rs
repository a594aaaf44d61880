use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A row of a user's watchlist or readlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Membership {
    pub id: i32,
    pub user_id: i32,
    pub item_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Listed item as read from the store, before the display rating is derived
#[derive(Debug, Clone, FromRow)]
pub struct ListedItemRecord {
    pub id: i32,
    pub title: String,
    /// Director of a movie or author of a book
    pub creator: String,
    pub genre: Option<Vec<String>>,
    pub release_year: Option<i32>,
    /// Static rating stored on the item
    pub rating: Option<f64>,
    /// Mean of the item's review ratings, `None` without reviews
    pub review_average: Option<f64>,
}

/// Item on a user's list as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListedItem {
    pub id: i32,
    pub title: String,
    pub creator: String,
    pub genre: Vec<String>,
    pub release_year: Option<i32>,
    pub rating: Option<f64>,
    /// Review average, or the configured fallback when unreviewed
    pub display_rating: f64,
    /// Always true: only listed items are returned
    pub is_added: bool,
}

/// Request body for adding an item to a list
///
/// `movie_id` / `book_id` are accepted in place of `item_id`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddMembershipRequest {
    #[serde(alias = "userId")]
    pub user_id: i32,
    #[serde(alias = "movie_id", alias = "book_id", alias = "movieId", alias = "bookId", alias = "itemId")]
    pub item_id: i32,
}
