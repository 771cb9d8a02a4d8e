//! Upload blob storage.
//!
//! Catalog PDFs and product datasheets are stored as `bytea` rows and
//! referenced by id from `catalogs.link` and `products.datasheet`.

use sqlx::{PgConnection, PgPool};

use noble_paints_core::UploadId;

use super::RepositoryError;
use crate::models::Upload;

/// A file received from a multipart form.
#[derive(Clone)]
pub struct NewUpload {
    pub filename: String,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for NewUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUpload")
            .field("filename", &self.filename)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Repository for reading stored uploads.
pub struct UploadRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UploadRepository<'a> {
    /// Create a new upload repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch an upload with its bytes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: UploadId) -> Result<Option<Upload>, RepositoryError> {
        let upload =
            sqlx::query_as::<_, Upload>("SELECT id, filename, data FROM uploads WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        Ok(upload)
    }
}

/// Insert an upload on an open connection, usually inside a transaction.
pub(crate) async fn insert(
    conn: &mut PgConnection,
    upload: &NewUpload,
) -> Result<UploadId, RepositoryError> {
    let id = sqlx::query_scalar::<_, UploadId>(
        "INSERT INTO uploads (filename, data) VALUES ($1, $2) RETURNING id",
    )
    .bind(&upload.filename)
    .bind(&upload.data)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

/// Replace the filename and bytes of an existing upload.
pub(crate) async fn replace(
    conn: &mut PgConnection,
    id: UploadId,
    upload: &NewUpload,
) -> Result<(), RepositoryError> {
    let result = sqlx::query("UPDATE uploads SET filename = $2, data = $3 WHERE id = $1")
        .bind(id)
        .bind(&upload.filename)
        .bind(&upload.data)
        .execute(conn)
        .await?;
    super::require_affected(result.rows_affected())
}

/// Store `upload` in place of `existing`, or as a new row when there is none.
///
/// Returns the id now holding the file.
pub(crate) async fn store(
    conn: &mut PgConnection,
    existing: Option<UploadId>,
    upload: &NewUpload,
) -> Result<UploadId, RepositoryError> {
    if let Some(id) = existing {
        match replace(&mut *conn, id, upload).await {
            Ok(()) => return Ok(id),
            // The referenced row was removed out from under us.
            Err(RepositoryError::NotFound) => {}
            Err(e) => return Err(e),
        }
    }
    insert(conn, upload).await
}

/// Delete an upload if it exists.
pub(crate) async fn delete(conn: &mut PgConnection, id: UploadId) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM uploads WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}
