//! Technical datasheet management.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use noble_paints_core::{DatasheetId, ListingFilter, Locale};

use super::{AdminListQuery, Chrome, edit_value, json_body, parse_id, required};
use crate::db::content::{DatasheetUpdate, NewDatasheet};
use crate::db::{DatasheetRepository, ListingOrder};
use crate::error::{ApiError, Result};
use crate::filters;
use crate::middleware::{ActiveLocale, RequireAdminAuth};
use crate::models::Datasheet;
use crate::routes::Success;
use crate::state::AppState;

const ENTITY: &str = "Technical datasheet";

super::admin_listing!(DatasheetsTemplate, "admin/datasheets.html", Datasheet);

/// JSON body of datasheet writes.
#[derive(Debug, Default, Deserialize)]
pub struct DatasheetPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
}

/// One page of datasheets across both locales.
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
) -> Result<DatasheetsTemplate> {
    let show = query.show();
    let filter = ListingFilter::any_locale(active.locale);
    let (items, pagination) = DatasheetRepository::new(state.pool())
        .page(&filter, ListingOrder::LocaleRelevance(active.locale), query.page(), show)
        .await?;
    let chrome = Chrome::new(
        &session,
        &active,
        admin,
        "cp.datasheets",
        "/ControlPanel/TechnicalDatasheets/",
        &pagination,
        show,
    )
    .await;
    Ok(DatasheetsTemplate::from_chrome(chrome, items))
}

/// # Errors
///
/// Returns 400 without a name and link.
#[instrument(skip(state, active, _admin, body), fields(locale = %active.locale))]
pub async fn add(
    State(state): State<AppState>,
    active: ActiveLocale,
    _admin: RequireAdminAuth,
    body: Bytes,
) -> std::result::Result<Success, ApiError> {
    let payload: DatasheetPayload = json_body(&body);
    let (Some(name), Some(link)) =
        (required(payload.name.as_ref()), required(payload.link.as_ref()))
    else {
        return Err(ApiError::BadRequest("Name and link are required.".to_owned()));
    };

    let lang = edit_value(payload.lang)
        .map_or(active.locale, |code| Locale::normalize(Some(&code)));

    let id = DatasheetRepository::new(state.pool())
        .create(&NewDatasheet {
            name,
            link,
            category: edit_value(payload.category),
            country: edit_value(payload.country),
            lang,
        })
        .await?;

    Ok(Success::created("Technical datasheet created successfully.", id))
}

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
    let id: DatasheetId = parse_id(&id, ENTITY)?;
    let payload: DatasheetPayload = json_body(&body);

    DatasheetRepository::new(state.pool())
        .update(
            id,
            &DatasheetUpdate {
                name: edit_value(payload.name),
                link: edit_value(payload.link),
                category: edit_value(payload.category),
                country: edit_value(payload.country),
                lang: edit_value(payload.lang).and_then(|code| Locale::parse(&code)),
            },
        )
        .await
        .map_err(ApiError::for_entity(ENTITY))?;

    Ok(Success::new("Technical datasheet updated successfully."))
}

/// # Errors
///
/// Returns 404 for an unknown id.
#[instrument(skip(state, _admin))]
pub async fn remove(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Path(id): Path<String>,
) -> std::result::Result<Success, ApiError> {
    let id: DatasheetId = parse_id(&id, ENTITY)?;
    DatasheetRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(ApiError::for_entity(ENTITY))?;

    Ok(Success::new("Technical datasheet deleted successfully."))
}
