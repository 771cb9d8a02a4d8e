//! News listing and detail pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::instrument;

use noble_paints_core::{Pagination, PostId, is_sentinel, parse_page};

use super::{Layout, PUBLIC_PAGE_SIZE, Pager, or_empty};
use crate::db::PostRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::ActiveLocale;
use crate::models::Post;
use crate::state::AppState;

const LATEST_LIMIT: i64 = 5;
const MOST_VIEWED_LIMIT: i64 = 10;

/// `?page=&type=` of the news listing.
#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    pub page: Option<String>,
    /// News category.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl NewsQuery {
    fn category(&self) -> Option<&str> {
        self.kind.as_deref().map(str::trim).filter(|v| !is_sentinel(v))
    }
}

/// News listing template.
#[derive(Template, WebTemplate)]
#[template(path = "news/index.html")]
pub struct NewsTemplate {
    pub layout: Layout,
    pub kind: String,
    pub items: Vec<Post>,
    pub pager: Pager,
}

/// Paginated news of the active locale.
#[instrument(skip(state, active), fields(locale = %active.locale))]
pub async fn index(
    State(state): State<AppState>,
    active: ActiveLocale,
    Query(query): Query<NewsQuery>,
) -> NewsTemplate {
    let category = query.category();
    let page = parse_page(query.page.as_deref());

    let (items, pagination) = PostRepository::new(state.pool())
        .page(active.locale, category, page, PUBLIC_PAGE_SIZE)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to load news");
            (Vec::new(), Pagination::new(1, PUBLIC_PAGE_SIZE, 0))
        });
    let kind = category.unwrap_or_default().to_owned();

    NewsTemplate {
        layout: Layout::new(&active),
        pager: Pager::new(&pagination, "/news/", &[("type", kind.as_str())]),
        kind,
        items,
    }
}

/// News detail template.
#[derive(Template, WebTemplate)]
#[template(path = "news/show.html")]
pub struct PostTemplate {
    pub layout: Layout,
    pub post: Post,
    pub latest: Vec<Post>,
    pub most_viewed: Vec<Post>,
}

/// Display one post and count the view.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the id is unparseable or unknown.
#[instrument(skip(state, active))]
pub async fn show(
    State(state): State<AppState>,
    active: ActiveLocale,
    Path(id): Path<String>,
) -> Result<PostTemplate> {
    let id: PostId = id
        .parse()
        .map_err(|_| AppError::NotFound(format!("post {id}")))?;

    let posts = PostRepository::new(state.pool());
    let post = posts
        .record_view(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id}")))?;
    let latest = or_empty(posts.latest(active.locale, LATEST_LIMIT).await, "latest news");
    let most_viewed = or_empty(
        posts.most_viewed(active.locale, MOST_VIEWED_LIMIT).await,
        "most viewed news",
    );

    Ok(PostTemplate {
        layout: Layout::new(&active),
        post,
        latest,
        most_viewed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_type_sentinels_are_unset() {
        let query = |kind: &str| NewsQuery {
            page: None,
            kind: Some(kind.to_owned()),
        };
        assert_eq!(query("Events").category(), Some("Events"));
        assert_eq!(query("All").category(), None);
        assert_eq!(query("undefined").category(), None);
        assert_eq!(NewsQuery::default().category(), None);
    }
}
