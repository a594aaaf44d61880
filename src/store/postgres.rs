use async_trait::async_trait;
use sqlx::PgPool;

use super::{EntityLookup, MembershipStore, ReviewStore, StoreError};
use crate::lists::{ListedItemRecord, Membership};
use crate::models::ItemKind;
use crate::reviews::{NewReview, RatingStats, Review};

/// PostgreSQL implementation of the list and review stores
///
/// Table and column names come from `ItemKind`, which only yields static
/// identifiers, so formatting them into SQL is safe. All values are bound.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityLookup for PgStore {
    async fn user_exists(&self, user_id: i32) -> Result<bool, StoreError> {
        let exists: Option<bool> = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists.unwrap_or(false))
    }

    async fn item_exists(&self, kind: ItemKind, item_id: i32) -> Result<bool, StoreError> {
        let query = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", kind.item_table());
        let exists: Option<bool> = sqlx::query_scalar(&query)
            .bind(item_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists.unwrap_or(false))
    }
}

#[async_trait]
impl MembershipStore for PgStore {
    async fn insert_membership(
        &self,
        kind: ItemKind,
        user_id: i32,
        item_id: i32,
    ) -> Result<Membership, StoreError> {
        let query = format!(
            r#"
            INSERT INTO {table} (user_id, {column})
            VALUES ($1, $2)
            RETURNING id, user_id, {column} AS item_id, created_at
            "#,
            table = kind.list_table(),
            column = kind.item_column(),
        );

        sqlx::query_as::<_, Membership>(&query)
            .bind(user_id)
            .bind(item_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_insert)
    }

    async fn list_membership(
        &self,
        kind: ItemKind,
        user_id: i32,
    ) -> Result<Vec<ListedItemRecord>, StoreError> {
        let query = format!(
            r#"
            SELECT i.id, i.title, i.{creator} AS creator, i.genre, i.release_year, i.rating,
                   AVG(r.rating)::float8 AS review_average
            FROM {list} l
            JOIN {items} i ON i.id = l.{column}
            LEFT JOIN {reviews} r ON r.{column} = i.id
            WHERE l.user_id = $1
            GROUP BY l.id, i.id
            ORDER BY l.id
            "#,
            creator = kind.creator_column(),
            list = kind.list_table(),
            items = kind.item_table(),
            reviews = kind.review_table(),
            column = kind.item_column(),
        );

        let records = sqlx::query_as::<_, ListedItemRecord>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn delete_membership(
        &self,
        kind: ItemKind,
        user_id: i32,
        item_id: i32,
    ) -> Result<Option<Membership>, StoreError> {
        let query = format!(
            r#"
            DELETE FROM {table}
            WHERE user_id = $1 AND {column} = $2
            RETURNING id, user_id, {column} AS item_id, created_at
            "#,
            table = kind.list_table(),
            column = kind.item_column(),
        );

        let deleted = sqlx::query_as::<_, Membership>(&query)
            .bind(user_id)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(deleted)
    }
}

#[async_trait]
impl ReviewStore for PgStore {
    async fn insert_review(&self, kind: ItemKind, review: NewReview) -> Result<Review, StoreError> {
        let query = format!(
            r#"
            INSERT INTO {table} (user_id, {column}, rating, review)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, {column} AS item_id, rating, review, created_at
            "#,
            table = kind.review_table(),
            column = kind.item_column(),
        );

        sqlx::query_as::<_, Review>(&query)
            .bind(review.user_id)
            .bind(review.item_id)
            .bind(review.rating)
            .bind(review.review)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_insert)
    }

    async fn list_reviews(&self, kind: ItemKind, item_id: i32) -> Result<Vec<Review>, StoreError> {
        let query = format!(
            r#"
            SELECT id, user_id, {column} AS item_id, rating, review, created_at
            FROM {table}
            WHERE {column} = $1
            ORDER BY created_at, id
            "#,
            table = kind.review_table(),
            column = kind.item_column(),
        );

        let reviews = sqlx::query_as::<_, Review>(&query)
            .bind(item_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(reviews)
    }

    async fn delete_review(
        &self,
        kind: ItemKind,
        user_id: i32,
        item_id: i32,
    ) -> Result<Option<Review>, StoreError> {
        let query = format!(
            r#"
            DELETE FROM {table}
            WHERE user_id = $1 AND {column} = $2
            RETURNING id, user_id, {column} AS item_id, rating, review, created_at
            "#,
            table = kind.review_table(),
            column = kind.item_column(),
        );

        let deleted = sqlx::query_as::<_, Review>(&query)
            .bind(user_id)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(deleted)
    }

    async fn rating_stats(&self, kind: ItemKind, item_id: i32) -> Result<RatingStats, StoreError> {
        let query = format!(
            r#"
            SELECT AVG(rating)::float8 AS average, COUNT(*) AS review_count
            FROM {table}
            WHERE {column} = $1
            "#,
            table = kind.review_table(),
            column = kind.item_column(),
        );

        let stats = sqlx::query_as::<_, RatingStats>(&query)
            .bind(item_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(stats)
    }

    async fn static_rating(
        &self,
        kind: ItemKind,
        item_id: i32,
    ) -> Result<Option<Option<f64>>, StoreError> {
        let query = format!("SELECT rating FROM {} WHERE id = $1", kind.item_table());
        let row: Option<(Option<f64>,)> = sqlx::query_as(&query)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(rating,)| rating))
    }
}
