use std::sync::Arc;

use crate::error::ServiceError;
use crate::models::ItemKind;
use crate::reviews::{NewReview, Review};
use crate::store::{missing_reference, ReviewStore, StoreError};
use crate::validation::validate_review_rating;

/// Service layer for review business logic
#[derive(Clone)]
pub struct ReviewService {
    store: Arc<dyn ReviewStore>,
}

impl ReviewService {
    pub fn new(store: Arc<dyn ReviewStore>) -> Self {
        Self { store }
    }

    /// Create a new review
    ///
    /// This method:
    /// 1. Validates the rating, before touching the store
    /// 2. Verifies the user and the item exist
    /// 3. Inserts the review; the store's unique index rejects a second
    ///    review by the same user for the same item, and its foreign keys
    ///    catch a user or item deleted since step 2
    pub async fn add_review(
        &self,
        kind: ItemKind,
        item_id: i32,
        user_id: i32,
        rating: f64,
        text: Option<String>,
    ) -> Result<Review, ServiceError> {
        // 1. Validate input
        validate_review_rating(rating).map_err(|_| {
            ServiceError::InvalidArgument("Rating must be between 1 and 10".to_string())
        })?;

        // 2. Verify referenced entities
        if !self.store.user_exists(user_id).await? {
            return Err(ServiceError::not_found("User", user_id));
        }
        if !self.store.item_exists(kind, item_id).await? {
            return Err(ServiceError::not_found(kind.label(), item_id));
        }

        // 3. Insert
        let new_review = NewReview {
            user_id,
            item_id,
            rating,
            review: text,
        };
        match self.store.insert_review(kind, new_review).await {
            Ok(review) => {
                tracing::info!(
                    "User {} reviewed {} {} with rating {}",
                    user_id,
                    kind.label(),
                    item_id,
                    rating
                );
                Ok(review)
            }
            Err(StoreError::UniqueViolation) => Err(ServiceError::Conflict(format!(
                "User {} has already reviewed this {}",
                user_id,
                kind.label().to_lowercase()
            ))),
            Err(StoreError::ForeignKeyViolation) => {
                Err(missing_reference(self.store.as_ref(), kind, user_id, item_id).await)
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Get all reviews for an item, oldest first
    pub async fn list_reviews(&self, kind: ItemKind, item_id: i32) -> Result<Vec<Review>, ServiceError> {
        let reviews = self.store.list_reviews(kind, item_id).await?;
        tracing::debug!("Retrieved {} reviews for {} {}", reviews.len(), kind.label(), item_id);
        Ok(reviews)
    }

    /// Delete the review a user wrote for an item
    ///
    /// Returns `None` when the user had not reviewed the item.
    pub async fn remove_review(
        &self,
        kind: ItemKind,
        item_id: i32,
        user_id: i32,
    ) -> Result<Option<Review>, ServiceError> {
        let deleted = self.store.delete_review(kind, user_id, item_id).await?;
        if deleted.is_some() {
            tracing::info!("Removed review of user {} for {} {}", user_id, kind.label(), item_id);
        }
        Ok(deleted)
    }
}
