use sqlx::{postgres::PgRow, FromRow, PgPool};

use super::models::{Book, CreateBook, CreateMovie, Movie, RatedRow, UpdateBook, UpdateMovie};
use super::query::{rated_select, CatalogQueryBuilder, SqlParam};
use crate::models::ItemKind;

/// Repository for movie and book persistence operations
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs a catalogue query and binds its parameters in placeholder order
    async fn fetch_rated<T>(
        &self,
        sql: &str,
        params: Vec<SqlParam>,
    ) -> Result<Vec<RatedRow<T>>, sqlx::Error>
    where
        RatedRow<T>: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut query = sqlx::query_as::<_, RatedRow<T>>(sql);
        for param in params {
            query = match param {
                SqlParam::Text(value) => query.bind(value),
                SqlParam::Int(value) => query.bind(value),
                SqlParam::Float(value) => query.bind(value),
            };
        }
        query.fetch_all(&self.pool).await
    }

    async fn find_rated<T>(&self, kind: ItemKind, id: i32) -> Result<Option<RatedRow<T>>, sqlx::Error>
    where
        RatedRow<T>: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = format!("{} WHERE i.id = $1 GROUP BY i.id", rated_select(kind));
        sqlx::query_as::<_, RatedRow<T>>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Items matching the builder's filters, in the builder's order
    pub async fn search<T>(&self, builder: CatalogQueryBuilder) -> Result<Vec<RatedRow<T>>, sqlx::Error>
    where
        RatedRow<T>: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let (sql, params) = builder.build();
        self.fetch_rated(&sql, params).await
    }

    async fn delete(&self, kind: ItemKind, id: i32) -> Result<bool, sqlx::Error> {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.item_table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    // ------------------------------------------------------------------
    // Movies
    // ------------------------------------------------------------------

    pub async fn create_movie(&self, movie: CreateMovie) -> Result<Movie, sqlx::Error> {
        sqlx::query_as::<_, Movie>(
            r#"
            INSERT INTO movies (title, director, synopsis, release_year, rating, genre, cast_members, poster_url, link_youtube)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(movie.title)
        .bind(movie.director)
        .bind(movie.synopsis)
        .bind(movie.release_year)
        .bind(movie.rating)
        .bind(movie.genre)
        .bind(movie.cast_members)
        .bind(movie.poster_url)
        .bind(movie.link_youtube)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn list_movies(&self) -> Result<Vec<RatedRow<Movie>>, sqlx::Error> {
        self.search(CatalogQueryBuilder::new(ItemKind::Movie)).await
    }

    pub async fn find_movie(&self, id: i32) -> Result<Option<RatedRow<Movie>>, sqlx::Error> {
        self.find_rated(ItemKind::Movie, id).await
    }

    /// Applies a partial update; returns None when the movie does not exist
    pub async fn update_movie(&self, id: i32, update: UpdateMovie) -> Result<Option<Movie>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let Some(existing) = sqlx::query_as::<_, Movie>("SELECT * FROM movies WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let updated = sqlx::query_as::<_, Movie>(
            r#"
            UPDATE movies
            SET title = $1, director = $2, synopsis = $3, release_year = $4, rating = $5,
                genre = $6, cast_members = $7, poster_url = $8, link_youtube = $9
            WHERE id = $10
            RETURNING *
            "#,
        )
        .bind(update.title.unwrap_or(existing.title))
        .bind(update.director.unwrap_or(existing.director))
        .bind(update.synopsis.or(existing.synopsis))
        .bind(update.release_year.or(existing.release_year))
        .bind(update.rating.or(existing.rating))
        .bind(update.genre.unwrap_or(existing.genre))
        .bind(update.cast_members.or(existing.cast_members))
        .bind(update.poster_url.or(existing.poster_url))
        .bind(update.link_youtube.or(existing.link_youtube))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    pub async fn delete_movie(&self, id: i32) -> Result<bool, sqlx::Error> {
        self.delete(ItemKind::Movie, id).await
    }

    // ------------------------------------------------------------------
    // Books
    // ------------------------------------------------------------------

    pub async fn create_book(&self, book: CreateBook) -> Result<Book, sqlx::Error> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, publisher, description, release_year, rating, genre, cover_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(book.title)
        .bind(book.author)
        .bind(book.publisher)
        .bind(book.description)
        .bind(book.release_year)
        .bind(book.rating)
        .bind(book.genre)
        .bind(book.cover_url)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn list_books(&self) -> Result<Vec<RatedRow<Book>>, sqlx::Error> {
        self.search(CatalogQueryBuilder::new(ItemKind::Book)).await
    }

    pub async fn find_book(&self, id: i32) -> Result<Option<RatedRow<Book>>, sqlx::Error> {
        self.find_rated(ItemKind::Book, id).await
    }

    /// Applies a partial update; returns None when the book does not exist
    pub async fn update_book(&self, id: i32, update: UpdateBook) -> Result<Option<Book>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let Some(existing) = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $1, author = $2, publisher = $3, description = $4, release_year = $5,
                rating = $6, genre = $7, cover_url = $8
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(update.title.unwrap_or(existing.title))
        .bind(update.author.unwrap_or(existing.author))
        .bind(update.publisher.or(existing.publisher))
        .bind(update.description.or(existing.description))
        .bind(update.release_year.or(existing.release_year))
        .bind(update.rating.or(existing.rating))
        .bind(update.genre.or(existing.genre))
        .bind(update.cover_url.or(existing.cover_url))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    pub async fn delete_book(&self, id: i32) -> Result<bool, sqlx::Error> {
        self.delete(ItemKind::Book, id).await
    }
}
