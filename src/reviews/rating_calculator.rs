use std::str::FromStr;
use std::sync::Arc;

use crate::error::ServiceError;
use crate::models::ItemKind;
use crate::reviews::RatingSummary;
use crate::store::ReviewStore;

/// Value reported for an item's rating when it has no reviews
///
/// Every place that exposes a derived rating (list views, catalogue views,
/// the rating summary) resolves the empty case through this one policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatingFallback {
    /// Use the item's static rating, or 0 if it has none
    #[default]
    StaticRating,
    /// Always report 0
    Zero,
}

impl RatingFallback {
    /// Resolve the displayed rating from a review average and static rating
    pub fn resolve(self, review_average: Option<f64>, static_rating: Option<f64>) -> f64 {
        match (review_average, self) {
            (Some(average), _) => average,
            (None, RatingFallback::StaticRating) => static_rating.unwrap_or(0.0),
            (None, RatingFallback::Zero) => 0.0,
        }
    }
}

impl FromStr for RatingFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "static" | "static_rating" => Ok(RatingFallback::StaticRating),
            "zero" => Ok(RatingFallback::Zero),
            other => Err(format!("unknown rating fallback '{}'", other)),
        }
    }
}

/// Computes average ratings from reviews
///
/// Nothing is cached: every call aggregates the current review rows, so an
/// insert or delete is visible on the next read.
#[derive(Clone)]
pub struct RatingCalculator {
    store: Arc<dyn ReviewStore>,
    fallback: RatingFallback,
}

impl RatingCalculator {
    pub fn new(store: Arc<dyn ReviewStore>, fallback: RatingFallback) -> Self {
        Self { store, fallback }
    }

    pub fn fallback(&self) -> RatingFallback {
        self.fallback
    }

    /// Average rating of an item, falling back per policy when unreviewed
    pub async fn average_rating(
        &self,
        kind: ItemKind,
        item_id: i32,
    ) -> Result<RatingSummary, ServiceError> {
        let static_rating = self
            .store
            .static_rating(kind, item_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(kind.label(), item_id))?;

        let stats = self.store.rating_stats(kind, item_id).await?;
        tracing::debug!(
            "Rating stats for {} {}: average={:?}, count={}",
            kind,
            item_id,
            stats.average,
            stats.review_count
        );

        Ok(RatingSummary {
            item_id,
            average_rating: self.fallback.resolve(stats.average, static_rating),
            review_count: stats.review_count,
            from_reviews: stats.average.is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reviews::NewReview;
    use crate::store::memory::MemoryStore;
    use proptest::prelude::*;

    const MOVIE: i32 = 10;

    fn seeded_store() -> Arc<MemoryStore> {
        Arc::new(
            MemoryStore::new()
                .with_user(1)
                .with_user(2)
                .with_user(3)
                .with_item(ItemKind::Movie, MOVIE, "Heat", Some(6.5))
                .with_item(ItemKind::Movie, 11, "Unrated", None),
        )
    }

    async fn insert(store: &MemoryStore, user_id: i32, rating: f64) {
        store
            .insert_review(
                ItemKind::Movie,
                NewReview { user_id, item_id: MOVIE, rating, review: None },
            )
            .await
            .expect("insert should succeed");
    }

    #[test]
    fn test_resolve_prefers_review_average() {
        assert_eq!(RatingFallback::StaticRating.resolve(Some(8.0), Some(3.0)), 8.0);
        assert_eq!(RatingFallback::Zero.resolve(Some(8.0), Some(3.0)), 8.0);
    }

    #[test]
    fn test_resolve_empty_case_per_policy() {
        assert_eq!(RatingFallback::StaticRating.resolve(None, Some(3.0)), 3.0);
        assert_eq!(RatingFallback::StaticRating.resolve(None, None), 0.0);
        assert_eq!(RatingFallback::Zero.resolve(None, Some(3.0)), 0.0);
    }

    #[test]
    fn test_parse_fallback() {
        assert_eq!("static".parse::<RatingFallback>(), Ok(RatingFallback::StaticRating));
        assert_eq!("ZERO".parse::<RatingFallback>(), Ok(RatingFallback::Zero));
        assert!("average".parse::<RatingFallback>().is_err());
    }

    #[tokio::test]
    async fn test_average_of_seven_and_nine_is_eight() {
        let store = seeded_store();
        insert(&store, 1, 7.0).await;
        insert(&store, 2, 9.0).await;

        let calculator = RatingCalculator::new(store, RatingFallback::StaticRating);
        let summary = calculator.average_rating(ItemKind::Movie, MOVIE).await.unwrap();

        assert_eq!(summary.average_rating, 8.0);
        assert_eq!(summary.review_count, 2);
        assert!(summary.from_reviews);
    }

    #[tokio::test]
    async fn test_average_reverts_to_static_rating_after_reviews_removed() {
        let store = seeded_store();
        let calculator = RatingCalculator::new(store.clone(), RatingFallback::StaticRating);

        let before = calculator.average_rating(ItemKind::Movie, MOVIE).await.unwrap();
        assert_eq!(before.average_rating, 6.5);
        assert!(!before.from_reviews);

        insert(&store, 1, 7.0).await;
        insert(&store, 2, 9.0).await;
        assert_eq!(
            calculator.average_rating(ItemKind::Movie, MOVIE).await.unwrap().average_rating,
            8.0
        );

        store.delete_review(ItemKind::Movie, 1, MOVIE).await.unwrap();
        assert_eq!(
            calculator.average_rating(ItemKind::Movie, MOVIE).await.unwrap().average_rating,
            9.0
        );

        store.delete_review(ItemKind::Movie, 2, MOVIE).await.unwrap();
        let after = calculator.average_rating(ItemKind::Movie, MOVIE).await.unwrap();
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn test_zero_policy_reports_zero_without_reviews() {
        let calculator = RatingCalculator::new(seeded_store(), RatingFallback::Zero);
        let summary = calculator.average_rating(ItemKind::Movie, MOVIE).await.unwrap();

        assert_eq!(summary.average_rating, 0.0);
        assert_eq!(summary.review_count, 0);
    }

    #[tokio::test]
    async fn test_item_without_static_rating_falls_back_to_zero() {
        let calculator = RatingCalculator::new(seeded_store(), RatingFallback::StaticRating);
        let summary = calculator.average_rating(ItemKind::Movie, 11).await.unwrap();

        assert_eq!(summary.average_rating, 0.0);
    }

    #[tokio::test]
    async fn test_unknown_item_is_not_found() {
        let calculator = RatingCalculator::new(seeded_store(), RatingFallback::StaticRating);
        let result = calculator.average_rating(ItemKind::Book, MOVIE).await;

        match result {
            Err(ServiceError::NotFound { resource, id }) => {
                assert_eq!(resource, "Book");
                assert_eq!(id, MOVIE);
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn prop_resolve_returns_average_when_present(
            average in 1.0f64..=10.0,
            static_rating in proptest::option::of(0.0f64..=10.0)
        ) {
            prop_assert_eq!(RatingFallback::StaticRating.resolve(Some(average), static_rating), average);
            prop_assert_eq!(RatingFallback::Zero.resolve(Some(average), static_rating), average);
        }
    }
}
