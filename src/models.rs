use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The two kinds of catalogued work a user can list and review
///
/// Movies live on a user's watchlist, books on their readlist. Every
/// kind-specific table and column name used by the store is derived from
/// this tag, so the membership and review code paths stay shared.
///
/// In URLs the kind appears in its plural form (`movies`, `books`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ItemKind {
    #[serde(rename = "movies", alias = "movie")]
    Movie,
    #[serde(rename = "books", alias = "book")]
    Book,
}

impl ItemKind {
    /// Human readable resource name, used in error messages
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Movie => "Movie",
            ItemKind::Book => "Book",
        }
    }

    /// Name of the list this kind of item is collected into
    pub fn list_name(self) -> &'static str {
        match self {
            ItemKind::Movie => "watchlist",
            ItemKind::Book => "readlist",
        }
    }

    pub fn item_table(self) -> &'static str {
        match self {
            ItemKind::Movie => "movies",
            ItemKind::Book => "books",
        }
    }

    /// Foreign key column pointing at the item in list and review tables
    pub fn item_column(self) -> &'static str {
        match self {
            ItemKind::Movie => "movie_id",
            ItemKind::Book => "book_id",
        }
    }

    pub fn list_table(self) -> &'static str {
        match self {
            ItemKind::Movie => "movie_watchlist",
            ItemKind::Book => "book_readlist",
        }
    }

    pub fn review_table(self) -> &'static str {
        match self {
            ItemKind::Movie => "movie_reviews",
            ItemKind::Book => "book_reviews",
        }
    }

    /// Column holding the item's creator (director or author)
    pub fn creator_column(self) -> &'static str {
        match self {
            ItemKind::Movie => "director",
            ItemKind::Book => "author",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.item_table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_kind_deserializes_plural_and_singular() {
        let movies: ItemKind = serde_json::from_str("\"movies\"").unwrap();
        let movie: ItemKind = serde_json::from_str("\"movie\"").unwrap();
        let books: ItemKind = serde_json::from_str("\"books\"").unwrap();

        assert_eq!(movies, ItemKind::Movie);
        assert_eq!(movie, ItemKind::Movie);
        assert_eq!(books, ItemKind::Book);
    }

    #[test]
    fn test_item_kind_rejects_unknown_kind() {
        let result: Result<ItemKind, _> = serde_json::from_str("\"podcasts\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_item_kind_serializes_plural() {
        assert_eq!(serde_json::to_string(&ItemKind::Book).unwrap(), "\"books\"");
        assert_eq!(ItemKind::Movie.to_string(), "movies");
    }

    #[test]
    fn test_item_kind_table_names_are_distinct_per_kind() {
        for kind in [ItemKind::Movie, ItemKind::Book] {
            assert!(kind.list_table().starts_with(&kind.item_column()[..4]));
            assert!(kind.review_table().ends_with("_reviews"));
        }
        assert_ne!(ItemKind::Movie.list_table(), ItemKind::Book.list_table());
        assert_eq!(ItemKind::Movie.list_name(), "watchlist");
        assert_eq!(ItemKind::Book.list_name(), "readlist");
    }
}
