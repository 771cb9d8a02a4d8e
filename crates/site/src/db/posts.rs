//! News post repository.

use sqlx::PgPool;

use noble_paints_core::{ListingFilter, Locale, Pagination, PostId};

use super::query::{Listing, ListingOrder};
use super::{RepositoryError, require_affected};
use crate::models::Post;

const POSTS: Listing<'static> = Listing {
    table: "posts",
    columns: "id, title, description, date, lang, img, category, views",
};

/// Fields for a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub date: Option<String>,
    pub img: Option<String>,
    pub category: Option<String>,
    pub lang: Locale,
}

/// Partial post update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub img: Option<String>,
    pub category: Option<String>,
    pub lang: Option<Locale>,
}

/// Repository for news posts.
pub struct PostRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One page of posts in `locale`, newest first, optionally of one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn page(
        &self,
        locale: Locale,
        category: Option<&str>,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<Post>, Pagination), RepositoryError> {
        let filter = ListingFilter::new(locale).category(category);
        POSTS
            .fetch_page(self.pool, &filter, ListingOrder::IdDesc, page, per_page)
            .await
    }

    /// The newest `limit` posts in `locale`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest(&self, locale: Locale, limit: i64) -> Result<Vec<Post>, RepositoryError> {
        POSTS
            .fetch_all(
                self.pool,
                &ListingFilter::new(locale),
                ListingOrder::IdDesc,
                Some(limit),
            )
            .await
    }

    /// The `limit` most viewed posts in `locale`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn most_viewed(&self, locale: Locale, limit: i64) -> Result<Vec<Post>, RepositoryError> {
        let rows = sqlx::query_as::<_, Post>(&format!(
            "SELECT {} FROM posts WHERE lang = $1 ORDER BY views DESC, id DESC LIMIT $2",
            POSTS.columns
        ))
        .bind(locale.code())
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: PostId) -> Result<Option<Post>, RepositoryError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {} FROM posts WHERE id = $1",
            POSTS.columns
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(post)
    }

    /// Increment the view counter and return the updated post.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn record_view(&self, id: PostId) -> Result<Option<Post>, RepositoryError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "UPDATE posts SET views = views + 1 WHERE id = $1 RETURNING {}",
            POSTS.columns
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(post)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, post: &NewPost) -> Result<PostId, RepositoryError> {
        let id = sqlx::query_scalar::<_, PostId>(
            r"
            INSERT INTO posts (title, description, date, img, category, lang)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.date)
        .bind(&post.img)
        .bind(&post.category)
        .bind(post.lang.code())
        .fetch_one(self.pool)
        .await?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no post has this id.
    pub async fn update(&self, id: PostId, update: &PostUpdate) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE posts SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                img = COALESCE($5, img),
                category = COALESCE($6, category),
                lang = COALESCE($7, lang)
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.date)
        .bind(&update.img)
        .bind(&update.category)
        .bind(update.lang.map(Locale::code))
        .execute(self.pool)
        .await?;
        require_affected(result.rows_affected())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no post has this id.
    pub async fn delete(&self, id: PostId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        require_affected(result.rows_affected())
    }
}
