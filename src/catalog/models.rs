use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::reviews::RatingFallback;
use crate::validation::validate_genres;

/// Represents a movie in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Movie {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Alien")]
    pub title: String,
    #[schema(example = "Ridley Scott")]
    pub director: String,
    pub synopsis: Option<String>,
    #[schema(example = 1979)]
    pub release_year: Option<i32>,
    /// Static rating, independent of user reviews
    #[schema(example = 8.5, minimum = 0.0, maximum = 10.0)]
    pub rating: Option<f64>,
    #[schema(example = json!(["Horror", "Sci-Fi"]))]
    pub genre: Vec<String>,
    #[serde(rename = "cast")]
    pub cast_members: Option<Vec<String>>,
    pub poster_url: Option<String>,
    pub link_youtube: Option<String>,
}

/// Data needed to create a movie
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMovie {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub director: String,
    pub synopsis: Option<String>,
    #[serde(alias = "releaseYear")]
    pub release_year: Option<i32>,
    #[validate(range(min = 0.0, max = 10.0))]
    pub rating: Option<f64>,
    #[validate(length(min = 1), custom = "validate_genres")]
    pub genre: Vec<String>,
    #[serde(rename = "cast", default)]
    pub cast_members: Option<Vec<String>>,
    #[serde(alias = "posterUrl")]
    #[validate(length(max = 500))]
    pub poster_url: Option<String>,
    #[serde(alias = "linkYoutube")]
    #[validate(length(max = 500))]
    pub link_youtube: Option<String>,
}

/// Partial update of a movie; omitted fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateMovie {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub director: Option<String>,
    pub synopsis: Option<String>,
    #[serde(alias = "releaseYear")]
    pub release_year: Option<i32>,
    #[validate(range(min = 0.0, max = 10.0))]
    pub rating: Option<f64>,
    #[validate(length(min = 1), custom = "validate_genres")]
    pub genre: Option<Vec<String>>,
    #[serde(rename = "cast", default)]
    pub cast_members: Option<Vec<String>>,
    #[serde(alias = "posterUrl")]
    #[validate(length(max = 500))]
    pub poster_url: Option<String>,
    #[serde(alias = "linkYoutube")]
    #[validate(length(max = 500))]
    pub link_youtube: Option<String>,
}

/// Represents a book in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Solaris")]
    pub title: String,
    #[schema(example = "Stanislaw Lem")]
    pub author: String,
    pub publisher: Option<String>,
    pub description: Option<String>,
    #[schema(example = 1961)]
    pub release_year: Option<i32>,
    #[schema(example = 8.0, minimum = 0.0, maximum = 10.0)]
    pub rating: Option<f64>,
    pub genre: Option<Vec<String>>,
    pub cover_url: Option<String>,
}

/// Data needed to create a book
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub author: String,
    #[validate(length(max = 100))]
    pub publisher: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "releaseYear")]
    pub release_year: Option<i32>,
    #[validate(range(min = 0.0, max = 10.0))]
    pub rating: Option<f64>,
    #[validate(custom = "validate_genres")]
    pub genre: Option<Vec<String>>,
    #[serde(alias = "coverUrl")]
    #[validate(length(max = 500))]
    pub cover_url: Option<String>,
}

/// Partial update of a book; omitted fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub author: Option<String>,
    #[validate(length(max = 100))]
    pub publisher: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "releaseYear")]
    pub release_year: Option<i32>,
    #[validate(range(min = 0.0, max = 10.0))]
    pub rating: Option<f64>,
    #[validate(custom = "validate_genres")]
    pub genre: Option<Vec<String>>,
    #[serde(alias = "coverUrl")]
    #[validate(length(max = 500))]
    pub cover_url: Option<String>,
}

/// Catalogue row joined with its review aggregate
#[derive(Debug, Clone, FromRow)]
pub struct RatedRow<T> {
    #[sqlx(flatten)]
    pub item: T,
    pub review_average: Option<f64>,
    pub review_count: i64,
}

/// Catalogue item as returned to clients, with its derived rating
///
/// The item's own fields are flattened next to `average_rating`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedView<T> {
    #[serde(flatten)]
    pub item: T,
    /// Review average, or the configured fallback when unreviewed
    pub average_rating: f64,
    pub review_count: i64,
}

/// Access to the static rating used when an item has no reviews
pub trait StaticRating {
    fn static_rating(&self) -> Option<f64>;
}

impl StaticRating for Movie {
    fn static_rating(&self) -> Option<f64> {
        self.rating
    }
}

impl StaticRating for Book {
    fn static_rating(&self) -> Option<f64> {
        self.rating
    }
}

pub type MovieView = RatedView<Movie>;
pub type BookView = RatedView<Book>;

impl<T: StaticRating> RatedRow<T> {
    pub fn into_view(self, fallback: RatingFallback) -> RatedView<T> {
        let average_rating = fallback.resolve(self.review_average, self.item.static_rating());
        RatedView {
            item: self.item,
            average_rating,
            review_count: self.review_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_movie() -> Movie {
        Movie {
            id: 1,
            title: "Alien".to_string(),
            director: "Ridley Scott".to_string(),
            synopsis: None,
            release_year: Some(1979),
            rating: Some(8.5),
            genre: vec!["Horror".to_string()],
            cast_members: Some(vec!["Sigourney Weaver".to_string()]),
            poster_url: None,
            link_youtube: None,
        }
    }

    fn valid_create_movie() -> CreateMovie {
        CreateMovie {
            title: "Alien".to_string(),
            director: "Ridley Scott".to_string(),
            synopsis: None,
            release_year: Some(1979),
            rating: Some(8.5),
            genre: vec!["Horror".to_string()],
            cast_members: None,
            poster_url: None,
            link_youtube: None,
        }
    }

    #[test]
    fn test_movie_serializes_cast_and_flattened_view() {
        let view = RatedRow {
            item: sample_movie(),
            review_average: None,
            review_count: 0,
        }
        .into_view(RatingFallback::StaticRating);

        let json = serde_json::to_value(&view).expect("Failed to serialize MovieView");
        assert_eq!(json["title"], "Alien");
        assert_eq!(json["cast"][0], "Sigourney Weaver");
        assert_eq!(json["average_rating"], 8.5);
        assert!(json.get("item").is_none());
    }

    #[test]
    fn test_view_prefers_review_average() {
        let view = RatedRow {
            item: sample_movie(),
            review_average: Some(6.0),
            review_count: 3,
        }
        .into_view(RatingFallback::StaticRating);

        assert_eq!(view.average_rating, 6.0);
        assert_eq!(view.review_count, 3);
    }

    #[test]
    fn test_view_zero_fallback_ignores_static_rating() {
        let view = RatedRow {
            item: sample_movie(),
            review_average: None,
            review_count: 0,
        }
        .into_view(RatingFallback::Zero);

        assert_eq!(view.average_rating, 0.0);
    }

    #[test]
    fn test_create_movie_validation() {
        assert!(valid_create_movie().validate().is_ok());

        let mut empty_title = valid_create_movie();
        empty_title.title = String::new();
        assert!(empty_title.validate().is_err());

        let mut long_title = valid_create_movie();
        long_title.title = "x".repeat(101);
        assert!(long_title.validate().is_err());

        let mut no_genre = valid_create_movie();
        no_genre.genre = vec![];
        assert!(no_genre.validate().is_err());

        let mut blank_genre = valid_create_movie();
        blank_genre.genre = vec!["  ".to_string()];
        assert!(blank_genre.validate().is_err());

        let mut bad_rating = valid_create_movie();
        bad_rating.rating = Some(10.5);
        assert!(bad_rating.validate().is_err());
    }

    #[test]
    fn test_update_book_validates_only_present_fields() {
        assert!(UpdateBook::default().validate().is_ok());

        let update = UpdateBook {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = UpdateBook {
            rating: Some(-1.0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_create_book_accepts_camel_case_aliases() {
        let book: CreateBook = serde_json::from_str(
            r#"{"title":"Solaris","author":"Stanislaw Lem","releaseYear":1961,"coverUrl":"http://x/y.png"}"#,
        )
        .expect("Failed to deserialize CreateBook");

        assert_eq!(book.release_year, Some(1961));
        assert_eq!(book.cover_url.as_deref(), Some("http://x/y.png"));
        assert!(book.validate().is_ok());
    }
}
