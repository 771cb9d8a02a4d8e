//! News management.
//!
//! The listing shows one locale at a time: `?lang=` when supported, else
//! the active locale.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use noble_paints_core::{Locale, PostId};

use super::{AdminListQuery, Chrome, edit_value, json_body, parse_id, required};
use crate::db::PostRepository;
use crate::db::posts::{NewPost, PostUpdate};
use crate::error::{ApiError, Result};
use crate::filters;
use crate::middleware::{ActiveLocale, RequireAdminAuth};
use crate::models::Post;
use crate::routes::{Pager, Success};
use crate::state::AppState;

const ENTITY: &str = "News item";
const PATH: &str = "/ControlPanel/news/";

super::admin_listing!(NewsTemplate, "admin/news.html", Post, listed_lang: &'static str);

/// JSON body of news writes.
#[derive(Debug, Default, Deserialize)]
pub struct NewsPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default, alias = "type")]
    pub category: Option<String>,
}

/// One page of news in the listed locale.
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
) -> Result<NewsTemplate> {
    let show = query.show();
    let listed = query
        .lang
        .as_deref()
        .and_then(Locale::parse)
        .unwrap_or(active.locale);

    let (items, pagination) = PostRepository::new(state.pool())
        .page(listed, None, query.page(), show)
        .await?;

    let mut chrome = Chrome::new(&session, &active, admin, "cp.news", PATH, &pagination, show).await;
    let show_param = show.to_string();
    chrome.pager = Pager::new(
        &pagination,
        PATH,
        &[("show", show_param.as_str()), ("lang", listed.code())],
    );
    Ok(NewsTemplate::from_chrome(chrome, items, listed.code()))
}

/// # Errors
///
/// Returns 400 without a title and description.
#[instrument(skip(state, active, _admin, body), fields(locale = %active.locale))]
pub async fn add(
    State(state): State<AppState>,
    active: ActiveLocale,
    _admin: RequireAdminAuth,
    body: Bytes,
) -> std::result::Result<Success, ApiError> {
    let payload: NewsPayload = json_body(&body);
    let (Some(title), Some(description)) = (
        required(payload.title.as_ref()),
        required(payload.description.as_ref()),
    ) else {
        return Err(ApiError::BadRequest(
            "Title and description are required.".to_owned(),
        ));
    };

    let lang = edit_value(payload.lang)
        .map_or(active.locale, |code| Locale::normalize(Some(&code)));

    let id = PostRepository::new(state.pool())
        .create(&NewPost {
            title,
            description,
            date: edit_value(payload.date),
            img: edit_value(payload.img),
            category: edit_value(payload.category),
            lang,
        })
        .await?;
    tracing::info!(post_id = %id, lang = lang.code(), "News item created");

    Ok(Success::created("News item created successfully.", id))
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
    let id: PostId = parse_id(&id, ENTITY)?;
    let payload: NewsPayload = json_body(&body);

    PostRepository::new(state.pool())
        .update(
            id,
            &PostUpdate {
                title: edit_value(payload.title),
                description: edit_value(payload.description),
                date: edit_value(payload.date),
                img: edit_value(payload.img),
                category: edit_value(payload.category),
                lang: edit_value(payload.lang).and_then(|code| Locale::parse(&code)),
            },
        )
        .await
        .map_err(ApiError::for_entity(ENTITY))?;

    Ok(Success::new("News item updated successfully."))
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
    let id: PostId = parse_id(&id, ENTITY)?;
    PostRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(ApiError::for_entity(ENTITY))?;
    tracing::info!(post_id = %id, "News item deleted");

    Ok(Success::new("News item deleted successfully."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_accepts_type_alias() {
        let payload: NewsPayload =
            json_body(br#"{"title":"Expo","description":"Booth 4","type":"Events"}"#);
        assert_eq!(payload.category.as_deref(), Some("Events"));
        assert_eq!(payload.title.as_deref(), Some("Expo"));
        assert!(payload.date.is_none());
    }
}
