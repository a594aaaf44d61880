// Store abstraction for the list, review and rating services
//
// Services receive a store handle at construction instead of reaching for a
// global connection. `PgStore` is the production implementation; tests use
// the in-memory `MemoryStore`.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::lists::{ListedItemRecord, Membership};
use crate::models::ItemKind;
use crate::reviews::{NewReview, RatingStats, Review};

pub use postgres::PgStore;

/// Errors surfaced by a store implementation
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A row with the same composite key already exists
    #[error("unique constraint violated")]
    UniqueViolation,

    /// A referenced user or item disappeared between check and insert
    #[error("foreign key constraint violated")]
    ForeignKeyViolation,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Classify a sqlx error raised by an insert
    pub fn from_insert(error: sqlx::Error) -> Self {
        if crate::db::is_unique_violation(&error) {
            StoreError::UniqueViolation
        } else if crate::db::is_foreign_key_violation(&error) {
            StoreError::ForeignKeyViolation
        } else {
            StoreError::Database(error)
        }
    }
}

/// Point lookups of the entities the core references but does not own
#[async_trait]
pub trait EntityLookup: Send + Sync {
    async fn user_exists(&self, user_id: i32) -> Result<bool, StoreError>;

    async fn item_exists(&self, kind: ItemKind, item_id: i32) -> Result<bool, StoreError>;
}

/// Name the entity behind a foreign key failure on insert
///
/// The user is reported when both lookups succeed again.
pub async fn missing_reference<S>(
    store: &S,
    kind: ItemKind,
    user_id: i32,
    item_id: i32,
) -> ServiceError
where
    S: EntityLookup + ?Sized,
{
    match store.user_exists(user_id).await {
        Ok(false) => return ServiceError::not_found("User", user_id),
        Err(e) => return e.into(),
        Ok(true) => {}
    }
    match store.item_exists(kind, item_id).await {
        Ok(false) => ServiceError::not_found(kind.label(), item_id),
        Err(e) => e.into(),
        Ok(true) => ServiceError::not_found("User", user_id),
    }
}

/// Watchlist / readlist rows keyed by `(user_id, item_id)`
#[async_trait]
pub trait MembershipStore: EntityLookup {
    /// Insert a membership row, failing with `UniqueViolation` if one exists
    async fn insert_membership(
        &self,
        kind: ItemKind,
        user_id: i32,
        item_id: i32,
    ) -> Result<Membership, StoreError>;

    /// Every item on the user's list, in insertion order, with review averages
    async fn list_membership(
        &self,
        kind: ItemKind,
        user_id: i32,
    ) -> Result<Vec<ListedItemRecord>, StoreError>;

    /// Delete by composite key, returning the deleted row if there was one
    async fn delete_membership(
        &self,
        kind: ItemKind,
        user_id: i32,
        item_id: i32,
    ) -> Result<Option<Membership>, StoreError>;
}

/// Review rows keyed by `(user_id, item_id)` and their aggregates
#[async_trait]
pub trait ReviewStore: EntityLookup {
    /// Insert a review, failing with `UniqueViolation` if the user already
    /// reviewed the item
    async fn insert_review(&self, kind: ItemKind, review: NewReview) -> Result<Review, StoreError>;

    /// All reviews of an item ordered by creation time
    async fn list_reviews(&self, kind: ItemKind, item_id: i32) -> Result<Vec<Review>, StoreError>;

    async fn delete_review(
        &self,
        kind: ItemKind,
        user_id: i32,
        item_id: i32,
    ) -> Result<Option<Review>, StoreError>;

    /// Mean rating and review count, computed fresh on every call
    async fn rating_stats(&self, kind: ItemKind, item_id: i32) -> Result<RatingStats, StoreError>;

    /// The item's static rating; `None` when the item does not exist
    async fn static_rating(
        &self,
        kind: ItemKind,
        item_id: i32,
    ) -> Result<Option<Option<f64>>, StoreError>;
}
