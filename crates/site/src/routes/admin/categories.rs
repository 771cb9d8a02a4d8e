//! Category management.
//!
//! Every successful write invalidates the categories cache.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use noble_paints_core::{CategoryId, Locale, Pagination};

use super::{AdminListQuery, Chrome, edit_value, json_body, parse_id, required};
use crate::db::CategoryRepository;
use crate::db::categories::{CategoryUpdate, NewCategory};
use crate::error::{ApiError, Result};
use crate::filters;
use crate::middleware::{ActiveLocale, RequireAdminAuth};
use crate::models::Category;
use crate::routes::Success;
use crate::state::AppState;

const ENTITY: &str = "Category";

super::admin_listing!(CategoriesTemplate, "admin/categories.html", Category);

/// JSON body of category writes.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub namearabic: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
}

/// Arabic name for `name`, when the translation service is configured.
async fn backfill_arabic(state: &AppState, name: &str) -> Option<String> {
    state
        .translator()?
        .try_translate(name, Locale::En, Locale::Ar)
        .await
}

/// One page of categories.
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
) -> Result<CategoriesTemplate> {
    let show = query.show();
    let (items, pagination): (Vec<Category>, Pagination) = CategoryRepository::new(state.pool())
        .list_page(query.page(), show)
        .await?;
    let chrome = Chrome::new(
        &session,
        &active,
        admin,
        "cp.categories",
        "/ControlPanel/categories/",
        &pagination,
        show,
    )
    .await;
    Ok(CategoriesTemplate::from_chrome(chrome, items))
}

/// Create a category.
///
/// # Errors
///
/// Returns 400 without a name and description.
#[instrument(skip(state, _admin, body))]
pub async fn add(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    body: Bytes,
) -> std::result::Result<Success, ApiError> {
    let payload: CategoryPayload = json_body(&body);
    let (Some(name), Some(description)) =
        (required(payload.name.as_ref()), required(payload.desc.as_ref()))
    else {
        return Err(ApiError::BadRequest(
            "Name and description are required.".to_owned(),
        ));
    };

    let name_arabic = match edit_value(payload.namearabic) {
        Some(arabic) => Some(arabic),
        None => backfill_arabic(&state, &name).await,
    };

    let id = CategoryRepository::new(state.pool())
        .create(&NewCategory {
            name,
            name_arabic,
            description,
            img: edit_value(payload.img),
        })
        .await?;
    state.categories().invalidate().await;
    tracing::info!(category_id = %id, "Category created");

    Ok(Success::created("Category created successfully.", id))
}

/// Update a category; blank fields keep their stored value.
///
/// # Errors
///
/// Returns 404 for an unknown id.
#[instrument(skip(state, _admin, body))]
pub async fn edit(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Path(id): Path<String>,
    body: Bytes,
) -> std::result::Result<Success, ApiError> {
    let id: CategoryId = parse_id(&id, ENTITY)?;
    let categories = CategoryRepository::new(state.pool());
    let stored = categories
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("{ENTITY} not found.")))?;

    let payload: CategoryPayload = json_body(&body);
    let name = edit_value(payload.name);
    let mut name_arabic = edit_value(payload.namearabic);
    if name_arabic.is_none() && stored.name_arabic_text().trim().is_empty() {
        let source = name.as_deref().unwrap_or_else(|| stored.name_text());
        if !source.trim().is_empty() {
            name_arabic = backfill_arabic(&state, source).await;
        }
    }

    categories
        .update(
            id,
            &CategoryUpdate {
                name,
                name_arabic,
                description: edit_value(payload.desc),
                img: edit_value(payload.img),
            },
        )
        .await
        .map_err(ApiError::for_entity(ENTITY))?;
    state.categories().invalidate().await;

    Ok(Success::new("Category updated successfully."))
}

/// Delete a category.
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
    let id: CategoryId = parse_id(&id, ENTITY)?;
    CategoryRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(ApiError::for_entity(ENTITY))?;
    state.categories().invalidate().await;
    tracing::info!(category_id = %id, "Category deleted");

    Ok(Success::new("Category deleted successfully."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_reads_legacy_field_names() {
        let payload: CategoryPayload =
            json_body(br#"{"name":"Wood","desc":"Stains","namearabic":"undefined"}"#);
        assert_eq!(payload.name.as_deref(), Some("Wood"));
        assert_eq!(payload.desc.as_deref(), Some("Stains"));
        assert_eq!(edit_value(payload.namearabic), None);

        let empty: CategoryPayload = json_body(b"");
        assert!(empty.name.is_none());
    }
}
