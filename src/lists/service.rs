use std::sync::Arc;

use crate::error::ServiceError;
use crate::lists::{ListedItem, ListedItemRecord, Membership};
use crate::models::ItemKind;
use crate::reviews::RatingFallback;
use crate::store::{missing_reference, MembershipStore, StoreError};

/// Service layer for watchlist and readlist membership
///
/// One instance serves both lists; the `ItemKind` argument selects which.
#[derive(Clone)]
pub struct MembershipService {
    store: Arc<dyn MembershipStore>,
    fallback: RatingFallback,
}

impl MembershipService {
    pub fn new(store: Arc<dyn MembershipStore>, fallback: RatingFallback) -> Self {
        Self { store, fallback }
    }

    /// Add an item to a user's list
    ///
    /// 1. Verifies the user exists
    /// 2. Verifies the item exists
    /// 3. Inserts the row; the store's unique index rejects duplicates and
    ///    its foreign keys catch a user or item deleted since the checks
    pub async fn add_membership(
        &self,
        kind: ItemKind,
        user_id: i32,
        item_id: i32,
    ) -> Result<Membership, ServiceError> {
        self.ensure_user(user_id).await?;

        if !self.store.item_exists(kind, item_id).await? {
            return Err(ServiceError::not_found(kind.label(), item_id));
        }

        match self.store.insert_membership(kind, user_id, item_id).await {
            Ok(membership) => {
                tracing::info!(
                    "Added {} {} to {} of user {}",
                    kind.label(),
                    item_id,
                    kind.list_name(),
                    user_id
                );
                Ok(membership)
            }
            Err(StoreError::UniqueViolation) => {
                tracing::warn!(
                    "{} {} already in {} of user {}",
                    kind.label(),
                    item_id,
                    kind.list_name(),
                    user_id
                );
                Err(ServiceError::Conflict(format!(
                    "{} already in {}",
                    kind.label(),
                    kind.list_name()
                )))
            }
            Err(StoreError::ForeignKeyViolation) => {
                Err(missing_reference(self.store.as_ref(), kind, user_id, item_id).await)
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Every item on a user's list with its display rating
    pub async fn list_membership(
        &self,
        kind: ItemKind,
        user_id: i32,
    ) -> Result<Vec<ListedItem>, ServiceError> {
        self.ensure_user(user_id).await?;

        let records = self.store.list_membership(kind, user_id).await?;
        tracing::debug!(
            "Retrieved {} items from {} of user {}",
            records.len(),
            kind.list_name(),
            user_id
        );

        Ok(records
            .into_iter()
            .map(|record| self.to_listed_item(record))
            .collect())
    }

    /// Remove an item from a user's list
    ///
    /// Returns `None` when there was nothing to delete; callers decide
    /// whether that is an error.
    pub async fn remove_membership(
        &self,
        kind: ItemKind,
        user_id: i32,
        item_id: i32,
    ) -> Result<Option<Membership>, ServiceError> {
        let deleted = self.store.delete_membership(kind, user_id, item_id).await?;
        if deleted.is_some() {
            tracing::info!(
                "Removed {} {} from {} of user {}",
                kind.label(),
                item_id,
                kind.list_name(),
                user_id
            );
        }
        Ok(deleted)
    }

    async fn ensure_user(&self, user_id: i32) -> Result<(), ServiceError> {
        if self.store.user_exists(user_id).await? {
            Ok(())
        } else {
            Err(ServiceError::not_found("User", user_id))
        }
    }

    fn to_listed_item(&self, record: ListedItemRecord) -> ListedItem {
        ListedItem {
            id: record.id,
            display_rating: self.fallback.resolve(record.review_average, record.rating),
            title: record.title,
            creator: record.creator,
            genre: record.genre.unwrap_or_default(),
            release_year: record.release_year,
            rating: record.rating,
            is_added: true,
        }
    }
}
