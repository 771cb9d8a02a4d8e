//! Repositories for localized content and documents.
//!
//! Products, catalogs and datasheets go through [`Listing`] so the public
//! pages and the control panel share one filter and ordering policy.

use sqlx::PgPool;

use noble_paints_core::{
    ApprovalId, CatalogId, CertificateId, DatasheetId, ListingFilter, Locale, Pagination,
    ProductId, SocialLinkId, UploadId, collect_fallback, order_by_id_list,
};

use super::query::{Listing, ListingOrder};
use super::uploads::{self, NewUpload};
use super::{RepositoryError, require_affected};
use crate::models::{Approval, Catalog, Certificate, Datasheet, Product, SocialLink};

/// Which filter column to list distinct values of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetColumn {
    Category,
    Country,
}

impl FacetColumn {
    const fn column(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Country => "country",
        }
    }
}

/// Sorted, non-empty distinct values of `column` among rows of `locale`.
async fn facet_values(
    pool: &PgPool,
    table: &str,
    column: FacetColumn,
    locale: Locale,
) -> Result<Vec<String>, RepositoryError> {
    let column = column.column();
    let values = sqlx::query_scalar::<_, String>(&format!(
        "SELECT DISTINCT {column} FROM {table} \
         WHERE lang = $1 AND {column} IS NOT NULL AND TRIM({column}) <> '' \
         ORDER BY {column}"
    ))
    .bind(locale.code())
    .fetch_all(pool)
    .await?;
    Ok(values)
}

// =============================================================================
// Products
// =============================================================================

const PRODUCTS: Listing<'static> = Listing {
    table: "products",
    columns: "id, img, name, description, category, country, lang, datasheet",
};

/// Fields for a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub img: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub lang: Locale,
}

/// Partial product update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub img: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub lang: Option<Locale>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Featured products for `locale`, in the order of `ids`.
    ///
    /// Ids missing in `locale` are looked up in the fallback locale; an id
    /// found in neither is skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn featured(
        &self,
        ids: &[ProductId],
        locale: Locale,
    ) -> Result<Vec<Product>, RepositoryError> {
        let ids: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let pool = self.pool;
        let wanted = &ids;
        let rows = collect_fallback(&locale.fallback_chain(), ids.len(), |lang| async move {
            sqlx::query_as::<_, Product>(&format!(
                "SELECT {} FROM products WHERE lang = $1 AND id = ANY($2)",
                PRODUCTS.columns
            ))
            .bind(lang.code())
            .bind(wanted)
            .fetch_all(pool)
            .await
            .map_err(RepositoryError::from)
        })
        .await?;

        Ok(order_by_id_list(rows, &ids))
    }

    /// Newest `count` products for `locale`, topped up from the fallback locale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn latest(&self, locale: Locale, count: usize) -> Result<Vec<Product>, RepositoryError> {
        let per_locale = i64::try_from(count.saturating_mul(2)).unwrap_or(i64::MAX);
        let pool = self.pool;
        collect_fallback(&locale.fallback_chain(), count, |lang| async move {
            let filter = ListingFilter::new(lang);
            PRODUCTS
                .fetch_all(pool, &filter, ListingOrder::IdDesc, Some(per_locale))
                .await
        })
        .await
    }

    /// Matching products, optionally capped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &ListingFilter,
        order: ListingOrder,
        limit: Option<i64>,
    ) -> Result<Vec<Product>, RepositoryError> {
        PRODUCTS.fetch_all(self.pool, filter, order, limit).await
    }

    /// One page of matching products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn page(
        &self,
        filter: &ListingFilter,
        order: ListingOrder,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<Product>, Pagination), RepositoryError> {
        PRODUCTS.fetch_page(self.pool, filter, order, page, per_page).await
    }

    /// Distinct filter values among products of `locale`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn facet(
        &self,
        column: FacetColumn,
        locale: Locale,
    ) -> Result<Vec<String>, RepositoryError> {
        facet_values(self.pool, PRODUCTS.table, column, locale).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCTS.columns
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(product)
    }

    /// Other products sharing `product`'s category, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn similar(&self, product: &Product, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let Some(category) = product.category.as_deref() else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE category = $1 AND id <> $2 ORDER BY id DESC LIMIT $3",
            PRODUCTS.columns
        ))
        .bind(category)
        .bind(product.id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Create a product, storing `datasheet` as its upload in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing is
    /// written in that case.
    pub async fn create(
        &self,
        product: &NewProduct,
        datasheet: Option<&NewUpload>,
    ) -> Result<ProductId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let datasheet_id = match datasheet {
            Some(upload) => Some(uploads::insert(&mut tx, upload).await?),
            None => None,
        };

        let id = sqlx::query_scalar::<_, ProductId>(
            r"
            INSERT INTO products (name, description, img, category, country, lang, datasheet)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            ",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.img)
        .bind(&product.category)
        .bind(&product.country)
        .bind(product.lang.code())
        .bind(datasheet_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(id)
    }

    /// Apply a partial update and optionally replace the datasheet file.
    ///
    /// A new file overwrites the existing upload or becomes a new one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    pub async fn update(
        &self,
        id: ProductId,
        update: &ProductUpdate,
        datasheet: Option<&NewUpload>,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_scalar::<_, Option<UploadId>>(
            "SELECT datasheet FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let datasheet_id = match datasheet {
            Some(upload) => Some(uploads::store(&mut tx, existing, upload).await?),
            None => None,
        };

        sqlx::query(
            r"
            UPDATE products SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                img = COALESCE($4, img),
                category = COALESCE($5, category),
                country = COALESCE($6, country),
                lang = COALESCE($7, lang),
                datasheet = COALESCE($8, datasheet)
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.description)
        .bind(&update.img)
        .bind(&update.category)
        .bind(&update.country)
        .bind(update.lang.map(Locale::code))
        .bind(datasheet_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        require_affected(result.rows_affected())
    }
}

// =============================================================================
// Catalogs
// =============================================================================

const CATALOGS: Listing<'static> = Listing {
    table: "catalogs",
    columns: "id, img, name, link, category, country, lang",
};

/// Fields for a new catalog; the PDF is passed separately.
#[derive(Debug, Clone)]
pub struct NewCatalog {
    pub name: String,
    pub img: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub lang: Locale,
}

/// Partial catalog update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct CatalogUpdate {
    pub name: Option<String>,
    pub img: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub lang: Option<Locale>,
}

/// Repository for catalog database operations.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Matching catalogs, optionally capped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &ListingFilter,
        order: ListingOrder,
        limit: Option<i64>,
    ) -> Result<Vec<Catalog>, RepositoryError> {
        CATALOGS.fetch_all(self.pool, filter, order, limit).await
    }

    /// One page of matching catalogs.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn page(
        &self,
        filter: &ListingFilter,
        order: ListingOrder,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<Catalog>, Pagination), RepositoryError> {
        CATALOGS.fetch_page(self.pool, filter, order, page, per_page).await
    }

    /// Distinct filter values among catalogs of `locale`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn facet(
        &self,
        column: FacetColumn,
        locale: Locale,
    ) -> Result<Vec<String>, RepositoryError> {
        facet_values(self.pool, CATALOGS.table, column, locale).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CatalogId) -> Result<Option<Catalog>, RepositoryError> {
        let catalog = sqlx::query_as::<_, Catalog>(&format!(
            "SELECT {} FROM catalogs WHERE id = $1",
            CATALOGS.columns
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(catalog)
    }

    /// Create a catalog and its upload in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either insert fails; nothing
    /// is written in that case.
    pub async fn create(
        &self,
        catalog: &NewCatalog,
        file: &NewUpload,
    ) -> Result<CatalogId, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let upload_id = uploads::insert(&mut tx, file).await?;

        let id = sqlx::query_scalar::<_, CatalogId>(
            r"
            INSERT INTO catalogs (name, img, link, category, country, lang)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(&catalog.name)
        .bind(&catalog.img)
        .bind(upload_id)
        .bind(&catalog.category)
        .bind(&catalog.country)
        .bind(catalog.lang.code())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(id)
    }

    /// Apply a partial update and optionally replace the catalog file.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no catalog has this id.
    pub async fn update(
        &self,
        id: CatalogId,
        update: &CatalogUpdate,
        file: Option<&NewUpload>,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_scalar::<_, Option<UploadId>>(
            "SELECT link FROM catalogs WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let link = match file {
            Some(upload) => Some(uploads::store(&mut tx, existing, upload).await?),
            None => None,
        };

        sqlx::query(
            r"
            UPDATE catalogs SET
                name = COALESCE($2, name),
                img = COALESCE($3, img),
                category = COALESCE($4, category),
                country = COALESCE($5, country),
                lang = COALESCE($6, lang),
                link = COALESCE($7, link)
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.img)
        .bind(&update.category)
        .bind(&update.country)
        .bind(update.lang.map(Locale::code))
        .bind(link)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Delete a catalog together with its upload.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no catalog has this id.
    pub async fn delete(&self, id: CatalogId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let link = sqlx::query_scalar::<_, Option<UploadId>>(
            "DELETE FROM catalogs WHERE id = $1 RETURNING link",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if let Some(upload_id) = link {
            uploads::delete(&mut tx, upload_id).await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

// =============================================================================
// Technical datasheets
// =============================================================================

const DATASHEETS: Listing<'static> = Listing {
    table: "technical_datasheets",
    columns: "id, name, link, category, country, lang",
};

/// Fields for a new technical datasheet.
#[derive(Debug, Clone)]
pub struct NewDatasheet {
    pub name: String,
    pub link: String,
    pub category: Option<String>,
    pub country: Option<String>,
    pub lang: Locale,
}

/// Partial datasheet update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct DatasheetUpdate {
    pub name: Option<String>,
    pub link: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub lang: Option<Locale>,
}

/// Repository for technical datasheet database operations.
pub struct DatasheetRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DatasheetRepository<'a> {
    /// Create a new datasheet repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Matching datasheets, optionally capped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &ListingFilter,
        order: ListingOrder,
        limit: Option<i64>,
    ) -> Result<Vec<Datasheet>, RepositoryError> {
        DATASHEETS.fetch_all(self.pool, filter, order, limit).await
    }

    /// One page of matching datasheets.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn page(
        &self,
        filter: &ListingFilter,
        order: ListingOrder,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<Datasheet>, Pagination), RepositoryError> {
        DATASHEETS.fetch_page(self.pool, filter, order, page, per_page).await
    }

    /// Distinct filter values among datasheets of `locale`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn facet(
        &self,
        column: FacetColumn,
        locale: Locale,
    ) -> Result<Vec<String>, RepositoryError> {
        facet_values(self.pool, DATASHEETS.table, column, locale).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, datasheet: &NewDatasheet) -> Result<DatasheetId, RepositoryError> {
        let id = sqlx::query_scalar::<_, DatasheetId>(
            r"
            INSERT INTO technical_datasheets (name, link, category, country, lang)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(&datasheet.name)
        .bind(&datasheet.link)
        .bind(&datasheet.category)
        .bind(&datasheet.country)
        .bind(datasheet.lang.code())
        .fetch_one(self.pool)
        .await?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no datasheet has this id.
    pub async fn update(
        &self,
        id: DatasheetId,
        update: &DatasheetUpdate,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE technical_datasheets SET
                name = COALESCE($2, name),
                link = COALESCE($3, link),
                category = COALESCE($4, category),
                country = COALESCE($5, country),
                lang = COALESCE($6, lang)
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.link)
        .bind(&update.category)
        .bind(&update.country)
        .bind(update.lang.map(Locale::code))
        .execute(self.pool)
        .await?;
        require_affected(result.rows_affected())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no datasheet has this id.
    pub async fn delete(&self, id: DatasheetId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM technical_datasheets WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        require_affected(result.rows_affected())
    }
}

// =============================================================================
// Certificates and approvals
// =============================================================================

/// Fields for a new certificate or approval.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub description: String,
    pub img: Option<String>,
    pub link: Option<String>,
}

/// Partial document update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct DocumentUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub img: Option<String>,
    pub link: Option<String>,
}

/// Certificates and approvals share a shape but live in separate tables.
macro_rules! document_repository {
    ($(#[$meta:meta])* $repo:ident, $row:ty, $id:ty, $table:literal) => {
        $(#[$meta])*
        pub struct $repo<'a> {
            pool: &'a PgPool,
        }

        impl<'a> $repo<'a> {
            #[must_use]
            pub const fn new(pool: &'a PgPool) -> Self {
                Self { pool }
            }

            /// Every row, newest first.
            ///
            /// # Errors
            ///
            /// Returns `RepositoryError::Database` if the query fails.
            pub async fn list_all(&self) -> Result<Vec<$row>, RepositoryError> {
                let rows = sqlx::query_as::<_, $row>(concat!(
                    "SELECT id, title, description, link, img FROM ",
                    $table,
                    " ORDER BY id DESC"
                ))
                .fetch_all(self.pool)
                .await?;
                Ok(rows)
            }

            /// One page of rows, newest first.
            ///
            /// # Errors
            ///
            /// Returns `RepositoryError::Database` if a query fails.
            pub async fn list_page(
                &self,
                page: u32,
                per_page: u32,
            ) -> Result<(Vec<$row>, Pagination), RepositoryError> {
                let total: i64 = sqlx::query_scalar(concat!("SELECT COUNT(*) FROM ", $table))
                    .fetch_one(self.pool)
                    .await?;
                let pagination = Pagination::new(page, per_page, u64::try_from(total).unwrap_or(0));

                let rows = sqlx::query_as::<_, $row>(concat!(
                    "SELECT id, title, description, link, img FROM ",
                    $table,
                    " ORDER BY id DESC LIMIT $1 OFFSET $2"
                ))
                .bind(pagination.sql_limit())
                .bind(pagination.sql_offset())
                .fetch_all(self.pool)
                .await?;
                Ok((rows, pagination))
            }

            /// # Errors
            ///
            /// Returns `RepositoryError::Database` if the insert fails.
            pub async fn create(&self, document: &NewDocument) -> Result<$id, RepositoryError> {
                let id = sqlx::query_scalar::<_, $id>(concat!(
                    "INSERT INTO ",
                    $table,
                    " (title, description, img, link) VALUES ($1, $2, $3, $4) RETURNING id"
                ))
                .bind(&document.title)
                .bind(&document.description)
                .bind(&document.img)
                .bind(&document.link)
                .fetch_one(self.pool)
                .await?;
                Ok(id)
            }

            /// # Errors
            ///
            /// Returns `RepositoryError::NotFound` if no row has this id.
            pub async fn update(&self, id: $id, update: &DocumentUpdate) -> Result<(), RepositoryError> {
                let result = sqlx::query(concat!(
                    "UPDATE ",
                    $table,
                    " SET title = COALESCE($2, title), description = COALESCE($3, description), \
                     img = COALESCE($4, img), link = COALESCE($5, link) WHERE id = $1"
                ))
                .bind(id)
                .bind(&update.title)
                .bind(&update.description)
                .bind(&update.img)
                .bind(&update.link)
                .execute(self.pool)
                .await?;
                require_affected(result.rows_affected())
            }

            /// # Errors
            ///
            /// Returns `RepositoryError::NotFound` if no row has this id.
            pub async fn delete(&self, id: $id) -> Result<(), RepositoryError> {
                let result = sqlx::query(concat!("DELETE FROM ", $table, " WHERE id = $1"))
                    .bind(id)
                    .execute(self.pool)
                    .await?;
                require_affected(result.rows_affected())
            }
        }
    };
}

document_repository!(
    /// Repository for quality certificates.
    CertificateRepository,
    Certificate,
    CertificateId,
    "certificates"
);

document_repository!(
    /// Repository for regulatory approvals.
    ApprovalRepository,
    Approval,
    ApprovalId,
    "approvals"
);

// =============================================================================
// Social links
// =============================================================================

/// Fields for a new social link.
#[derive(Debug, Clone)]
pub struct NewSocialLink {
    pub name: Option<String>,
    pub icon: String,
    pub link: String,
}

/// Partial social link update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct SocialLinkUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub link: Option<String>,
}

/// Repository for footer social links.
pub struct SocialLinkRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SocialLinkRepository<'a> {
    /// Create a new social link repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every link, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<SocialLink>, RepositoryError> {
        let rows = sqlx::query_as::<_, SocialLink>(
            "SELECT id, name, icon, link FROM social_links ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// One page of links, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_page(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<SocialLink>, Pagination), RepositoryError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM social_links")
            .fetch_one(self.pool)
            .await?;
        let pagination = Pagination::new(page, per_page, u64::try_from(total).unwrap_or(0));

        let rows = sqlx::query_as::<_, SocialLink>(
            "SELECT id, name, icon, link FROM social_links ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(pagination.sql_limit())
        .bind(pagination.sql_offset())
        .fetch_all(self.pool)
        .await?;
        Ok((rows, pagination))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, link: &NewSocialLink) -> Result<SocialLinkId, RepositoryError> {
        let id = sqlx::query_scalar::<_, SocialLinkId>(
            "INSERT INTO social_links (name, icon, link) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&link.name)
        .bind(&link.icon)
        .bind(&link.link)
        .fetch_one(self.pool)
        .await?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no link has this id.
    pub async fn update(
        &self,
        id: SocialLinkId,
        update: &SocialLinkUpdate,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE social_links SET
                name = COALESCE($2, name),
                icon = COALESCE($3, icon),
                link = COALESCE($4, link)
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.icon)
        .bind(&update.link)
        .execute(self.pool)
        .await?;
        require_affected(result.rows_affected())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no link has this id.
    pub async fn delete(&self, id: SocialLinkId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM social_links WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        require_affected(result.rows_affected())
    }
}
