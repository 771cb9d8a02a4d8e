//! Category repository.

use sqlx::PgPool;

use noble_paints_core::{CategoryId, CategoryRecord, Pagination};

use super::{RepositoryError, require_affected};
use crate::cache::CategorySource;
use crate::models::Category;

const COLUMNS: &str = "id, name, name_arabic, description, img";

/// Fields for a new category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub name_arabic: Option<String>,
    pub description: String,
    pub img: Option<String>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub name_arabic: Option<String>,
    pub description: Option<String>,
    pub img: Option<String>,
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories except `excluded`, ordered by id, with defaults applied.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_records(
        &self,
        excluded: CategoryId,
    ) -> Result<Vec<CategoryRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE id <> $1 ORDER BY id"
        ))
        .bind(excluded)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(CategoryRecord::from).collect())
    }

    /// One page of category rows for the control panel, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_page(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<Category>, Pagination), RepositoryError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(self.pool)
            .await?;
        let pagination = Pagination::new(page, per_page, u64::try_from(total).unwrap_or(0));

        let rows = sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.sql_limit())
        .bind(pagination.sql_offset())
        .fetch_all(self.pool)
        .await?;

        Ok((rows, pagination))
    }

    /// Create a category and return its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, category: &NewCategory) -> Result<CategoryId, RepositoryError> {
        let id = sqlx::query_scalar::<_, CategoryId>(
            r"
            INSERT INTO categories (name, name_arabic, description, img)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(&category.name)
        .bind(&category.name_arabic)
        .bind(&category.description)
        .bind(&category.img)
        .fetch_one(self.pool)
        .await?;
        Ok(id)
    }

    /// The stored row, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no category has this id.
    pub async fn update(
        &self,
        id: CategoryId,
        update: &CategoryUpdate,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE categories SET
                name = COALESCE($2, name),
                name_arabic = COALESCE($3, name_arabic),
                description = COALESCE($4, description),
                img = COALESCE($5, img)
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.name_arabic)
        .bind(&update.description)
        .bind(&update.img)
        .execute(self.pool)
        .await?;
        require_affected(result.rows_affected())
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no category has this id.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        require_affected(result.rows_affected())
    }
}

impl CategorySource for CategoryRepository<'_> {
    async fn fetch_categories(
        &self,
        excluded: CategoryId,
    ) -> Result<Vec<CategoryRecord>, RepositoryError> {
        self.list_records(excluded).await
    }
}
