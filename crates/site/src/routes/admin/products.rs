//! Product management.
//!
//! Writes are multipart: a `data` JSON part and an optional `file` part
//! stored as the product datasheet.

use axum::extract::{Multipart, Path, Query, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use noble_paints_core::{ListingFilter, Locale, ProductId};

use super::{AdminListQuery, Chrome, MultipartPayload, edit_value, parse_id, required};
use crate::db::content::{NewProduct, ProductUpdate};
use crate::db::{CategoryRepository, ListingOrder, ProductRepository};
use crate::error::{ApiError, Result};
use crate::filters;
use crate::middleware::{ActiveLocale, RequireAdminAuth};
use crate::models::Product;
use crate::routes::Success;
use crate::state::AppState;

const ENTITY: &str = "Product";
const MISSING_DATA: &str = "Missing product data payload.";
const INVALID_DATA: &str = "Invalid product data payload.";

super::admin_listing!(
    ProductsTemplate,
    "admin/products.html",
    Product,
    categories: Vec<String>
);

/// `data` part of product writes.
#[derive(Debug, Default, Deserialize)]
pub struct ProductPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
}

/// One page of products across both locales.
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
) -> Result<ProductsTemplate> {
    let show = query.show();
    let filter = ListingFilter::any_locale(active.locale);
    let (items, pagination) = ProductRepository::new(state.pool())
        .page(&filter, ListingOrder::LocaleRelevance(active.locale), query.page(), show)
        .await?;

    let categories = state
        .categories()
        .get(&CategoryRepository::new(state.pool()))
        .await
        .records
        .iter()
        .map(|c| c.name.clone())
        .collect();

    let chrome = Chrome::new(
        &session,
        &active,
        admin,
        "cp.products",
        "/ControlPanel/products/",
        &pagination,
        show,
    )
    .await;
    Ok(ProductsTemplate::from_chrome(chrome, items, categories))
}

/// Create a product, storing the optional file as its datasheet.
///
/// # Errors
///
/// Returns 400 for a missing or invalid payload, or without a name and
/// description.
#[instrument(skip(state, active, _admin, multipart), fields(locale = %active.locale))]
pub async fn add(
    State(state): State<AppState>,
    active: ActiveLocale,
    _admin: RequireAdminAuth,
    multipart: Multipart,
) -> std::result::Result<Success, ApiError> {
    let form = MultipartPayload::read(multipart).await?;
    let payload: ProductPayload = form.data(MISSING_DATA, INVALID_DATA)?;

    let (Some(name), Some(description)) =
        (required(payload.name.as_ref()), required(payload.desc.as_ref()))
    else {
        return Err(ApiError::BadRequest(
            "Name and description are required.".to_owned(),
        ));
    };

    let lang = edit_value(payload.lang)
        .map_or(active.locale, |code| Locale::normalize(Some(&code)));

    let id = ProductRepository::new(state.pool())
        .create(
            &NewProduct {
                name,
                description,
                img: edit_value(payload.img),
                category: edit_value(payload.category),
                country: edit_value(payload.country),
                lang,
            },
            form.file.as_ref(),
        )
        .await?;
    tracing::info!(product_id = %id, with_datasheet = form.file.is_some(), "Product created");

    Ok(Success::created("Product created successfully.", id))
}

/// Update a product; a new file replaces the stored datasheet.
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
    let id: ProductId = parse_id(&id, ENTITY)?;
    let form = MultipartPayload::read(multipart).await?;
    let payload: ProductPayload = form.data(MISSING_DATA, INVALID_DATA)?;

    let update = ProductUpdate {
        name: edit_value(payload.name),
        description: edit_value(payload.desc),
        img: edit_value(payload.img),
        category: edit_value(payload.category),
        country: edit_value(payload.country),
        lang: edit_value(payload.lang).and_then(|code| Locale::parse(&code)),
    };

    ProductRepository::new(state.pool())
        .update(id, &update, form.file.as_ref())
        .await
        .map_err(ApiError::for_entity(ENTITY))?;

    Ok(Success::new("Product updated successfully."))
}

/// Delete a product.
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
    let id: ProductId = parse_id(&id, ENTITY)?;
    ProductRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(ApiError::for_entity(ENTITY))?;
    tracing::info!(product_id = %id, "Product deleted");

    Ok(Success::new("Product deleted successfully."))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_requires_data_part() {
        let form = MultipartPayload::default();
        let error = form.data::<ProductPayload>(MISSING_DATA, INVALID_DATA).unwrap_err();
        assert_eq!(error.to_string(), MISSING_DATA);

        let form = MultipartPayload {
            data: Some(r#"{"name":"Primer","desc":"Base coat","lang":"ar"}"#.to_owned()),
            file: None,
        };
        let payload = form.data::<ProductPayload>(MISSING_DATA, INVALID_DATA).unwrap();
        assert_eq!(payload.name.as_deref(), Some("Primer"));
        assert_eq!(payload.lang.as_deref(), Some("ar"));
        assert!(payload.category.is_none());
    }
}
