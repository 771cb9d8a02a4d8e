//! Catalog management.
//!
//! A catalog always has a PDF: the `file` part is required on create and
//! replaces the stored upload on edit.

use axum::extract::{Multipart, Path, Query, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use noble_paints_core::{CatalogId, ListingFilter, Locale};

use super::{AdminListQuery, Chrome, MultipartPayload, edit_value, parse_id, required};
use crate::db::content::{CatalogUpdate, NewCatalog};
use crate::db::{CatalogRepository, ListingOrder};
use crate::error::{ApiError, Result};
use crate::filters;
use crate::middleware::{ActiveLocale, RequireAdminAuth};
use crate::models::Catalog;
use crate::routes::Success;
use crate::state::AppState;

const ENTITY: &str = "Catalog";
const MISSING_DATA: &str = "Missing catalog data payload.";
const INVALID_DATA: &str = "Invalid catalog data payload.";

super::admin_listing!(CatalogsTemplate, "admin/catalogs.html", Catalog);

/// `data` part of catalog writes.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
}

/// One page of catalogs across both locales.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    active: ActiveLocale,
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(query): Query<AdminListQuery>,
) -> Result<CatalogsTemplate> {
    let show = query.show();
    let filter = ListingFilter::any_locale(active.locale);
    let (items, pagination) = CatalogRepository::new(state.pool())
        .page(&filter, ListingOrder::LocaleRelevance(active.locale), query.page(), show)
        .await?;
    let chrome = Chrome::new(
        &session,
        &active,
        admin,
        "cp.catalogs",
        "/ControlPanel/catalogs/",
        &pagination,
        show,
    )
    .await;
    Ok(CatalogsTemplate::from_chrome(chrome, items))
}

/// Create a catalog and its upload in one transaction.
///
/// # Errors
///
/// Returns 400 for a missing or invalid payload, a blank name or a missing
/// file, and 500 if storing fails.
#[instrument(skip(state, active, _admin, multipart), fields(locale = %active.locale))]
pub async fn add(
    State(state): State<AppState>,
    active: ActiveLocale,
    _admin: RequireAdminAuth,
    multipart: Multipart,
) -> std::result::Result<Success, ApiError> {
    let form = MultipartPayload::read(multipart).await?;
    let payload: CatalogPayload = form.data(MISSING_DATA, INVALID_DATA)?;

    let Some(name) = required(payload.name.as_ref()) else {
        return Err(ApiError::BadRequest("Catalog name is required.".to_owned()));
    };
    let Some(file) = form.file.as_ref() else {
        return Err(ApiError::BadRequest(
            "Catalog file upload is required.".to_owned(),
        ));
    };

    let lang = edit_value(payload.lang)
        .map_or(active.locale, |code| Locale::normalize(Some(&code)));

    let id = CatalogRepository::new(state.pool())
        .create(
            &NewCatalog {
                name,
                img: edit_value(payload.img),
                category: edit_value(payload.category),
                country: edit_value(payload.country),
                lang,
            },
            file,
        )
        .await
        .map_err(|e| {
            ApiError::unavailable("Failed to create catalog. Please try again later.", e)
        })?;
    tracing::info!(catalog_id = %id, filename = %file.filename, "Catalog created");

    Ok(Success::created("Catalog created successfully.", id))
}

/// Update a catalog; a new file replaces the stored PDF.
///
/// # Errors
///
/// Returns 404 for an unknown id and 400 for a missing or invalid payload.
#[instrument(skip(state, _admin, multipart))]
pub async fn edit(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Path(id): Path<String>,
    multipart: Multipart,
) -> std::result::Result<Success, ApiError> {
    let id: CatalogId = parse_id(&id, ENTITY)?;
    let form = MultipartPayload::read(multipart).await?;
    let payload: CatalogPayload = form.data(MISSING_DATA, INVALID_DATA)?;

    let update = CatalogUpdate {
        name: edit_value(payload.name),
        img: edit_value(payload.img),
        category: edit_value(payload.category),
        country: edit_value(payload.country),
        lang: edit_value(payload.lang).and_then(|code| Locale::parse(&code)),
    };

    CatalogRepository::new(state.pool())
        .update(id, &update, form.file.as_ref())
        .await
        .map_err(ApiError::for_entity(ENTITY))?;

    Ok(Success::new("Catalog updated successfully."))
}

/// Delete a catalog and its PDF.
///
/// # Errors
///
/// Returns 404 for an unknown id.
#[instrument(skip(state, _admin))]
pub async fn remove(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Path(id): Path<String>,
) -> std::result::Result<Success, ApiError> {
    let id: CatalogId = parse_id(&id, ENTITY)?;
    CatalogRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(ApiError::for_entity(ENTITY))?;
    tracing::info!(catalog_id = %id, "Catalog deleted");

    Ok(Success::new("Catalog deleted successfully."))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_json_is_rejected() {
        let form = MultipartPayload {
            data: Some("name=Spring".to_owned()),
            file: None,
        };
        let error = form.data::<CatalogPayload>(MISSING_DATA, INVALID_DATA).unwrap_err();
        assert_eq!(error.to_string(), INVALID_DATA);
    }
}
