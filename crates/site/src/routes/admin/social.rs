//! Footer social icon management.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use noble_paints_core::SocialLinkId;

use super::{AdminListQuery, Chrome, edit_value, json_body, parse_id, required};
use crate::db::SocialLinkRepository;
use crate::db::content::{NewSocialLink, SocialLinkUpdate};
use crate::error::{ApiError, Result};
use crate::filters;
use crate::middleware::{ActiveLocale, RequireAdminAuth};
use crate::models::SocialLink;
use crate::routes::Success;
use crate::state::AppState;

const ENTITY: &str = "Social icon";

super::admin_listing!(SocialTemplate, "admin/social.html", SocialLink);

/// JSON body of social icon writes.
#[derive(Debug, Default, Deserialize)]
pub struct SocialPayload {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// # Errors
///
/// Returns an error if the query fails.
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    active: ActiveLocale,
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(query): Query<AdminListQuery>,
) -> Result<SocialTemplate> {
    let show = query.show();
    let (items, pagination) = SocialLinkRepository::new(state.pool())
        .list_page(query.page(), show)
        .await?;
    let chrome = Chrome::new(
        &session,
        &active,
        admin,
        "cp.social",
        "/ControlPanel/socialIcons/",
        &pagination,
        show,
    )
    .await;
    Ok(SocialTemplate::from_chrome(chrome, items))
}

/// # Errors
///
/// Returns 400 without a link and icon.
#[instrument(skip(state, _admin, body))]
pub async fn add(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    body: Bytes,
) -> std::result::Result<Success, ApiError> {
    let payload: SocialPayload = json_body(&body);
    let (Some(link), Some(icon)) =
        (required(payload.link.as_ref()), required(payload.icon.as_ref()))
    else {
        return Err(ApiError::BadRequest(
            "Link and icon are required fields.".to_owned(),
        ));
    };

    let id = SocialLinkRepository::new(state.pool())
        .create(&NewSocialLink {
            name: edit_value(payload.name),
            icon,
            link,
        })
        .await?;

    Ok(Success::created("Social icon created successfully.", id))
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
    let id: SocialLinkId = parse_id(&id, ENTITY)?;
    let payload: SocialPayload = json_body(&body);

    SocialLinkRepository::new(state.pool())
        .update(
            id,
            &SocialLinkUpdate {
                name: edit_value(payload.name),
                icon: edit_value(payload.icon),
                link: edit_value(payload.link),
            },
        )
        .await
        .map_err(ApiError::for_entity(ENTITY))?;

    Ok(Success::new("Social icon updated successfully."))
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
    let id: SocialLinkId = parse_id(&id, ENTITY)?;
    SocialLinkRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(ApiError::for_entity(ENTITY))?;

    Ok(Success::new("Social icon deleted successfully."))
}
