//! Cached category page and JSON endpoint.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use noble_paints_core::CategoryRecord;

use super::Layout;
use crate::cache::CategoriesSnapshot;
use crate::db::CategoryRepository;
use crate::filters;
use crate::middleware::ActiveLocale;
use crate::state::AppState;

const CACHE_CONTROL: &str = "public, max-age=300";

/// Categories page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories.html")]
pub struct CategoriesTemplate {
    pub layout: Layout,
    pub categories: Vec<CategoryRecord>,
}

fn page_etag(snapshot: &CategoriesSnapshot) -> String {
    format!("categories-{}-{}", snapshot.len(), snapshot.generation)
}

fn api_etag(generation: u64) -> String {
    format!("api-categories-{generation}")
}

/// Whether the client's `If-None-Match` names `etag`.
fn is_fresh(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.split(',').any(|candidate| candidate.trim().trim_matches('"') == etag))
}

/// Attach `Cache-Control` and, when it is a valid header value, the `ETag`.
fn with_cache_headers(mut response: Response, etag: &str) -> Response {
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL));
    if let Ok(value) = HeaderValue::from_str(etag) {
        headers.insert(header::ETAG, value);
    }
    response
}

/// Display the categories page from the cache.
pub async fn page(State(state): State<AppState>, active: ActiveLocale) -> Response {
    let snapshot = state
        .categories()
        .get(&CategoryRepository::new(state.pool()))
        .await;
    let etag = page_etag(&snapshot);

    let response = CategoriesTemplate {
        layout: Layout::new(&active),
        categories: snapshot.records.to_vec(),
    }
    .into_response();
    with_cache_headers(response, &etag)
}

#[derive(Debug, Serialize)]
struct CategoriesBody {
    categories: Vec<CategoryRecord>,
    count: usize,
    cached: bool,
    success: bool,
    timestamp: i64,
}

/// Cached categories as JSON.
///
/// Answers `304 Not Modified` when `If-None-Match` matches the current
/// cache generation.
pub async fn api(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let cache = state.categories();
    let current = api_etag(cache.generation().await);
    if is_fresh(&headers, &current) {
        return StatusCode::NOT_MODIFIED.into_response();
    }

    let snapshot = cache.get(&CategoryRepository::new(state.pool())).await;
    let etag = api_etag(snapshot.generation);
    let body = CategoriesBody {
        count: snapshot.len(),
        categories: snapshot.records.to_vec(),
        cached: snapshot.from_cache,
        success: true,
        timestamp: chrono::Utc::now().timestamp(),
    };

    with_cache_headers(Json(body).into_response(), &etag)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_page_etag_uses_count_and_generation() {
        let snapshot = CategoriesSnapshot {
            records: Arc::from(vec![CategoryRecord::loading_placeholder()]),
            generation: 0,
            from_cache: false,
        };
        assert_eq!(page_etag(&snapshot), "categories-1-0");
        assert_eq!(api_etag(7), "api-categories-7");
    }

    #[test]
    fn test_if_none_match_accepts_quoted_and_lists() {
        let mut headers = HeaderMap::new();
        assert!(!is_fresh(&headers, "api-categories-3"));

        headers.insert(header::IF_NONE_MATCH, HeaderValue::from_static("api-categories-3"));
        assert!(is_fresh(&headers, "api-categories-3"));

        headers.insert(
            header::IF_NONE_MATCH,
            HeaderValue::from_static(r#""api-categories-2", "api-categories-3""#),
        );
        assert!(is_fresh(&headers, "api-categories-3"));
        assert!(!is_fresh(&headers, "api-categories-4"));
    }

    #[test]
    fn test_json_response_carries_cache_control_and_etag() {
        let response = with_cache_headers(Json(serde_json::json!({})).into_response(), &api_etag(4));
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=300"
        );
        assert_eq!(response.headers().get(header::ETAG).unwrap(), "api-categories-4");
    }
}
