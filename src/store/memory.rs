// In-memory store used by service and handler tests
//
// Uniqueness of `(user_id, item_id)` is checked under the same lock as the
// insert, mirroring the unique indexes of the Postgres schema.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::{EntityLookup, MembershipStore, ReviewStore, StoreError};
use crate::lists::{ListedItemRecord, Membership};
use crate::models::ItemKind;
use crate::reviews::{NewReview, RatingStats, Review};

#[derive(Debug, Clone)]
struct ItemRecord {
    title: String,
    rating: Option<f64>,
}

#[derive(Default)]
struct State {
    users: HashSet<i32>,
    items: HashMap<(ItemKind, i32), ItemRecord>,
    memberships: Vec<(ItemKind, Membership)>,
    reviews: Vec<(ItemKind, Review)>,
    next_id: i32,
    writes: usize,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user_id: i32) -> Self {
        self.lock().users.insert(user_id);
        self
    }

    pub fn with_item(self, kind: ItemKind, item_id: i32, title: &str, rating: Option<f64>) -> Self {
        self.lock().items.insert(
            (kind, item_id),
            ItemRecord { title: title.to_string(), rating },
        );
        self
    }

    pub fn remove_user(&self, user_id: i32) {
        self.lock().users.remove(&user_id);
    }

    pub fn remove_item(&self, kind: ItemKind, item_id: i32) {
        self.lock().items.remove(&(kind, item_id));
    }

    /// Number of successful inserts and deletes performed so far
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl EntityLookup for MemoryStore {
    async fn user_exists(&self, user_id: i32) -> Result<bool, StoreError> {
        Ok(self.lock().users.contains(&user_id))
    }

    async fn item_exists(&self, kind: ItemKind, item_id: i32) -> Result<bool, StoreError> {
        Ok(self.lock().items.contains_key(&(kind, item_id)))
    }
}

#[async_trait]
impl MembershipStore for MemoryStore {
    async fn insert_membership(
        &self,
        kind: ItemKind,
        user_id: i32,
        item_id: i32,
    ) -> Result<Membership, StoreError> {
        let mut state = self.lock();
        if !state.users.contains(&user_id) || !state.items.contains_key(&(kind, item_id)) {
            return Err(StoreError::ForeignKeyViolation);
        }
        let exists = state
            .memberships
            .iter()
            .any(|(k, m)| *k == kind && m.user_id == user_id && m.item_id == item_id);
        if exists {
            return Err(StoreError::UniqueViolation);
        }

        let membership = Membership {
            id: state.next_id(),
            user_id,
            item_id,
            created_at: Utc::now(),
        };
        state.memberships.push((kind, membership.clone()));
        state.writes += 1;
        Ok(membership)
    }

    async fn list_membership(
        &self,
        kind: ItemKind,
        user_id: i32,
    ) -> Result<Vec<ListedItemRecord>, StoreError> {
        let state = self.lock();
        let records = state
            .memberships
            .iter()
            .filter(|(k, m)| *k == kind && m.user_id == user_id)
            .filter_map(|(_, m)| {
                let item = state.items.get(&(kind, m.item_id))?;
                let ratings: Vec<f64> = state
                    .reviews
                    .iter()
                    .filter(|(k, r)| *k == kind && r.item_id == m.item_id)
                    .map(|(_, r)| r.rating)
                    .collect();
                Some(ListedItemRecord {
                    id: m.item_id,
                    title: item.title.clone(),
                    creator: "Unknown".to_string(),
                    genre: None,
                    release_year: None,
                    rating: item.rating,
                    review_average: mean(&ratings),
                })
            })
            .collect();
        Ok(records)
    }

    async fn delete_membership(
        &self,
        kind: ItemKind,
        user_id: i32,
        item_id: i32,
    ) -> Result<Option<Membership>, StoreError> {
        let mut state = self.lock();
        let position = state
            .memberships
            .iter()
            .position(|(k, m)| *k == kind && m.user_id == user_id && m.item_id == item_id);
        Ok(position.map(|index| {
            state.writes += 1;
            state.memberships.remove(index).1
        }))
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn insert_review(&self, kind: ItemKind, review: NewReview) -> Result<Review, StoreError> {
        let mut state = self.lock();
        if !state.users.contains(&review.user_id)
            || !state.items.contains_key(&(kind, review.item_id))
        {
            return Err(StoreError::ForeignKeyViolation);
        }
        let exists = state
            .reviews
            .iter()
            .any(|(k, r)| *k == kind && r.user_id == review.user_id && r.item_id == review.item_id);
        if exists {
            return Err(StoreError::UniqueViolation);
        }

        let created = Review {
            id: state.next_id(),
            user_id: review.user_id,
            item_id: review.item_id,
            rating: review.rating,
            review: review.review,
            created_at: Utc::now(),
        };
        state.reviews.push((kind, created.clone()));
        state.writes += 1;
        Ok(created)
    }

    async fn list_reviews(&self, kind: ItemKind, item_id: i32) -> Result<Vec<Review>, StoreError> {
        Ok(self
            .lock()
            .reviews
            .iter()
            .filter(|(k, r)| *k == kind && r.item_id == item_id)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn delete_review(
        &self,
        kind: ItemKind,
        user_id: i32,
        item_id: i32,
    ) -> Result<Option<Review>, StoreError> {
        let mut state = self.lock();
        let position = state
            .reviews
            .iter()
            .position(|(k, r)| *k == kind && r.user_id == user_id && r.item_id == item_id);
        Ok(position.map(|index| {
            state.writes += 1;
            state.reviews.remove(index).1
        }))
    }

    async fn rating_stats(&self, kind: ItemKind, item_id: i32) -> Result<RatingStats, StoreError> {
        let ratings: Vec<f64> = self
            .lock()
            .reviews
            .iter()
            .filter(|(k, r)| *k == kind && r.item_id == item_id)
            .map(|(_, r)| r.rating)
            .collect();
        Ok(RatingStats {
            average: mean(&ratings),
            review_count: ratings.len() as i64,
        })
    }

    async fn static_rating(
        &self,
        kind: ItemKind,
        item_id: i32,
    ) -> Result<Option<Option<f64>>, StoreError> {
        Ok(self.lock().items.get(&(kind, item_id)).map(|item| item.rating))
    }
}

/// Which entity a [`VanishingStore`] deletes after its first lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vanish {
    User,
    Item,
}

/// Store whose user or item is deleted right after the service checked
/// for it, so the following insert hits the foreign key
pub struct VanishingStore {
    inner: MemoryStore,
    vanish: Vanish,
}

impl VanishingStore {
    pub fn new(inner: MemoryStore, vanish: Vanish) -> Self {
        Self { inner, vanish }
    }
}

#[async_trait]
impl EntityLookup for VanishingStore {
    async fn user_exists(&self, user_id: i32) -> Result<bool, StoreError> {
        let exists = self.inner.user_exists(user_id).await?;
        if self.vanish == Vanish::User {
            self.inner.remove_user(user_id);
        }
        Ok(exists)
    }

    async fn item_exists(&self, kind: ItemKind, item_id: i32) -> Result<bool, StoreError> {
        let exists = self.inner.item_exists(kind, item_id).await?;
        if self.vanish == Vanish::Item {
            self.inner.remove_item(kind, item_id);
        }
        Ok(exists)
    }
}

#[async_trait]
impl MembershipStore for VanishingStore {
    async fn insert_membership(
        &self,
        kind: ItemKind,
        user_id: i32,
        item_id: i32,
    ) -> Result<Membership, StoreError> {
        self.inner.insert_membership(kind, user_id, item_id).await
    }

    async fn list_membership(
        &self,
        kind: ItemKind,
        user_id: i32,
    ) -> Result<Vec<ListedItemRecord>, StoreError> {
        self.inner.list_membership(kind, user_id).await
    }

    async fn delete_membership(
        &self,
        kind: ItemKind,
        user_id: i32,
        item_id: i32,
    ) -> Result<Option<Membership>, StoreError> {
        self.inner.delete_membership(kind, user_id, item_id).await
    }
}

#[async_trait]
impl ReviewStore for VanishingStore {
    async fn insert_review(&self, kind: ItemKind, review: NewReview) -> Result<Review, StoreError> {
        self.inner.insert_review(kind, review).await
    }

    async fn list_reviews(&self, kind: ItemKind, item_id: i32) -> Result<Vec<Review>, StoreError> {
        self.inner.list_reviews(kind, item_id).await
    }

    async fn delete_review(
        &self,
        kind: ItemKind,
        user_id: i32,
        item_id: i32,
    ) -> Result<Option<Review>, StoreError> {
        self.inner.delete_review(kind, user_id, item_id).await
    }

    async fn rating_stats(&self, kind: ItemKind, item_id: i32) -> Result<RatingStats, StoreError> {
        self.inner.rating_stats(kind, item_id).await
    }

    async fn static_rating(
        &self,
        kind: ItemKind,
        item_id: i32,
    ) -> Result<Option<Option<f64>>, StoreError> {
        self.inner.static_rating(kind, item_id).await
    }
}

fn mean(ratings: &[f64]) -> Option<f64> {
    if ratings.is_empty() {
        None
    } else {
        Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
    }
}
