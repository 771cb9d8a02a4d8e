//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /, /home, /en/, /ar/          - Home page (featured + latest products)
//! GET  /about/, /colors/, ...        - Static informational pages
//! GET  /categories/                  - Cached categories page
//! GET  /api/categories/              - Cached categories JSON
//! GET  /product/?id=                 - Product detail
//! GET  /products/{category}/         - Products of one category
//! GET  /productsSearch/              - Filtered product search
//! GET  /catalogs/                    - Filtered catalogs
//! GET  /TechnicalDatasheets/         - Filtered technical datasheets
//! GET  /news/, /news/{id}/           - News listing and detail
//! GET  /certificates/, /approvals/   - Document listings
//! POST /sendC/                       - Contact form
//! GET  /download/{id}, /show/{id}/   - Stored uploads
//! GET  /getProducts/                 - Products JSON
//! GET  /getsocialIcons/              - Social links JSON
//!
//! # Auth
//! GET|POST /login/                   - Sign in
//! GET  /logout/                      - Sign out
//!
//! # Control panel (requires auth)
//! GET  /ControlPanel/...             - Listings
//! POST /ControlPanel/{entity}/add/   - Create
//! POST /ControlPanel/{entity}/edit/{id}/
//! DELETE|POST|GET /ControlPanel/{entity}/del/{id}/
//! ```

pub mod admin;
pub mod api;
pub mod auth;
pub mod catalogs;
pub mod categories;
pub mod contact;
pub mod datasheets;
pub mod documents;
pub mod home;
pub mod news;
pub mod pages;
pub mod products;
pub mod uploads;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use noble_paints_core::{ListingFilter, Locale, Pagination, parse_page};

use crate::db::RepositoryError;
use crate::i18n::I18n;
use crate::middleware::ActiveLocale;
use crate::state::AppState;

/// Page size of public listings.
pub const PUBLIC_PAGE_SIZE: u32 = 12;

/// Page numbers shown either side of the current page.
pub const PAGER_RADIUS: u32 = 2;

/// Values shared by every page template.
#[derive(Debug, Clone)]
pub struct Layout {
    pub i18n: I18n,
    pub lang: &'static str,
    pub dir: &'static str,
    pub switch_en: String,
    pub switch_ar: String,
    /// One-shot notice shown at the top of the page.
    pub flash: Option<String>,
}

impl Layout {
    #[must_use]
    pub fn new(active: &ActiveLocale) -> Self {
        Self {
            i18n: I18n::new(active.locale),
            lang: active.locale.code(),
            dir: active.locale.direction(),
            switch_en: active.switch_url(Locale::En),
            switch_ar: active.switch_url(Locale::Ar),
            flash: None,
        }
    }

    #[must_use]
    pub fn with_flash(mut self, flash: Option<String>) -> Self {
        self.flash = flash;
        self
    }

    #[must_use]
    pub const fn is_rtl(&self) -> bool {
        matches!(self.i18n.locale, Locale::Ar)
    }
}

/// Pager links for a clamped page.
#[derive(Debug, Clone)]
pub struct Pager {
    pub page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub previous: Option<u32>,
    pub next: Option<u32>,
    pub pages: Vec<u32>,
    /// Link prefix ending in `page=`.
    pub href_base: String,
}

impl Pager {
    /// Links to `path`, keeping the non-empty `params`.
    #[must_use]
    pub fn new(pagination: &Pagination, path: &str, params: &[(&str, &str)]) -> Self {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in params.iter().filter(|(_, v)| !v.is_empty()) {
            serializer.append_pair(key, value);
        }
        let query = serializer.finish();
        let href_base = if query.is_empty() {
            format!("{path}?page=")
        } else {
            format!("{path}?{query}&page=")
        };

        Self {
            page: pagination.page,
            total_pages: pagination.total_pages,
            total_items: pagination.total_items,
            previous: pagination.has_previous().then(|| pagination.previous()),
            next: pagination.has_next().then(|| pagination.next()),
            pages: pagination.window(PAGER_RADIUS),
            href_base,
        }
    }

    #[must_use]
    pub fn is_single_page(&self) -> bool {
        self.total_pages <= 1
    }
}

/// Query parameters of the filtered public listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub country: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
}

impl ListingQuery {
    /// Filter restricted to `locale`.
    #[must_use]
    pub fn filter(&self, locale: Locale) -> ListingFilter {
        ListingFilter::new(locale)
            .category(self.category.as_deref())
            .country(self.country.as_deref())
            .search(self.search.as_deref())
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        parse_page(self.page.as_deref())
    }
}

/// Pager for a filtered listing, echoing the active filter values.
#[must_use]
pub fn listing_pager(pagination: &Pagination, path: &str, filter: &ListingFilter) -> Pager {
    Pager::new(
        pagination,
        path,
        &[
            ("category", filter.category_label()),
            ("country", filter.country_label()),
            ("search", filter.search_term()),
        ],
    )
}

/// `{"success": true, "message": ...}` body of JSON write endpoints.
///
/// Answers `201 Created` when it carries the id of a new row.
#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
}

impl Success {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self {
            success: true,
            message,
            id: None,
        }
    }

    #[must_use]
    pub fn created(message: &'static str, id: impl Into<i32>) -> Self {
        Self {
            success: true,
            message,
            id: Some(id.into()),
        }
    }
}

impl IntoResponse for Success {
    fn into_response(self) -> Response {
        let status = if self.id.is_some() {
            StatusCode::CREATED
        } else {
            StatusCode::OK
        };
        (status, Json(self)).into_response()
    }
}

/// A listing page and the filter its rows were selected by.
#[derive(Debug)]
pub struct Listed<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
    pub filter: ListingFilter,
}

/// Rows of a listing page, degrading when storage fails.
///
/// A failed `primary` query is followed by `fallback`, which should fetch
/// the first page of [`fallback_filter`]; if that fails as well the page
/// renders empty. Either way the returned filter is [`fallback_filter`], so
/// the form and pager describe the rows actually shown.
pub async fn with_fallback<T, Fut>(
    listing: &'static str,
    filter: ListingFilter,
    primary: Result<(Vec<T>, Pagination), RepositoryError>,
    fallback: impl FnOnce() -> Fut,
) -> Listed<T>
where
    Fut: Future<Output = Result<(Vec<T>, Pagination), RepositoryError>>,
{
    let (items, pagination) = match primary {
        Ok(page) => {
            return Listed {
                items: page.0,
                pagination: page.1,
                filter,
            };
        }
        Err(e) => {
            tracing::error!(error = %e, listing, "Listing query failed; serving fallback");
            fallback().await.unwrap_or_else(|e| {
                tracing::error!(error = %e, listing, "Fallback listing query failed");
                (Vec::new(), Pagination::new(1, PUBLIC_PAGE_SIZE, 0))
            })
        }
    };
    Listed {
        items,
        pagination,
        filter: fallback_filter(),
    }
}

/// Default-locale filter with no other clauses.
#[must_use]
pub const fn fallback_filter() -> ListingFilter {
    ListingFilter::new(Locale::En)
}

/// Rows of a secondary query, or nothing when it fails.
pub fn or_empty<T>(result: Result<Vec<T>, RepositoryError>, what: &'static str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, what, "Query failed; rendering without it");
        Vec::new()
    })
}

/// Create all public and control panel routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home
        .route("/", get(home::home))
        .route("/home", get(home::home))
        .route("/en/", get(home::home_en))
        .route("/ar/", get(home::home_ar))
        // Static pages
        .route("/about/", get(pages::about))
        .route("/calculator/", get(pages::calculator))
        .route("/socialMedia/", get(pages::social_media))
        .route("/products/", get(pages::products))
        .route("/FindStore/", get(pages::find_store))
        .route("/colors/", get(pages::colors))
        .route("/contact/", get(pages::contact))
        .route("/ral-colors/", get(pages::ral_colors))
        // Categories (cached)
        .route("/categories/", get(categories::page))
        .route("/api/categories/", get(categories::api))
        // Products
        .route("/product/", get(products::show))
        .route("/products/{category}/", get(products::by_category))
        .route("/productsSearch/", get(products::search))
        // Listings
        .route("/catalogs/", get(catalogs::index))
        .route("/TechnicalDatasheets/", get(datasheets::index))
        .route("/news/", get(news::index))
        .route("/news/{id}/", get(news::show))
        .route("/certificates/", get(documents::certificates))
        .route("/approvals/", get(documents::approvals))
        // Contact
        .route("/sendC/", post(contact::send))
        // Uploads
        .route("/download/{id}", get(uploads::download))
        .route("/show/{id}/", get(uploads::show))
        // JSON
        .route("/getProducts/", get(api::products))
        .route("/getsocialIcons/", get(api::social_icons))
        // Auth
        .route("/login/", get(auth::login_page).post(auth::login))
        .route("/logout/", get(auth::logout))
        // Control panel
        .nest("/ControlPanel", admin::routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pager_keeps_filters_and_window() {
        let pagination = Pagination::new(3, 12, 100);
        let filter = ListingFilter::new(Locale::En)
            .category(Some("Wood Paints"))
            .search(Some("gloss"));
        let pager = listing_pager(&pagination, "/catalogs/", &filter);

        assert_eq!(pager.pages, vec![1, 2, 3, 4, 5]);
        assert_eq!(pager.previous, Some(2));
        assert_eq!(pager.next, Some(4));
        assert_eq!(
            pager.href_base,
            "/catalogs/?category=Wood+Paints&country=All&search=gloss&page="
        );
    }

    #[test]
    fn test_pager_without_params() {
        let pagination = Pagination::new(1, 12, 0);
        let pager = Pager::new(&pagination, "/news/", &[("type", "")]);
        assert_eq!(pager.href_base, "/news/?page=");
        assert!(pager.is_single_page());
        assert_eq!(pager.previous, None);
        assert_eq!(pager.next, None);
    }

    fn requested() -> ListingFilter {
        ListingFilter::new(Locale::Ar)
            .category(Some("Wood"))
            .country(Some("KSA"))
            .search(Some("primer"))
    }

    #[tokio::test]
    async fn test_with_fallback_keeps_filter_on_success() {
        let primary = Ok((vec![7], Pagination::new(2, 12, 30)));
        let listed = with_fallback("test", requested(), primary, || async {
            Err(RepositoryError::NotFound)
        })
        .await;
        assert_eq!(listed.items, vec![7]);
        assert_eq!(listed.pagination.page, 2);
        assert_eq!(listed.filter, requested());
    }

    #[tokio::test]
    async fn test_with_fallback_degrades_then_empties() {
        let failed = || Err(RepositoryError::NotFound);

        let listed = with_fallback("test", requested(), failed(), || async {
            Ok((vec![1, 2], Pagination::new(1, PUBLIC_PAGE_SIZE, 2)))
        })
        .await;
        assert_eq!(listed.items, vec![1, 2]);
        assert_eq!(listed.pagination.total_items, 2);
        assert_eq!(listed.filter, fallback_filter());

        let listed =
            with_fallback::<i32, _>("test", requested(), failed(), || async { failed() }).await;
        assert!(listed.items.is_empty());
        assert_eq!(listed.pagination.page, 1);
        assert_eq!(listed.pagination.total_pages, 1);
        assert_eq!(listed.filter, fallback_filter());
    }

    #[test]
    fn test_degraded_pager_drops_requested_filters() {
        let pagination = Pagination::new(1, PUBLIC_PAGE_SIZE, 40);
        let pager = listing_pager(&pagination, "/catalogs/", &fallback_filter());
        assert_eq!(
            pager.href_base,
            "/catalogs/?category=All&country=All&page="
        );
    }

    #[test]
    fn test_listing_query_drops_sentinels() {
        let query = ListingQuery {
            category: Some("All".to_owned()),
            country: Some("KSA".to_owned()),
            search: None,
            page: Some("x".to_owned()),
        };
        let filter = query.filter(Locale::Ar);
        assert_eq!(filter.category_label(), "All");
        assert_eq!(filter.country_label(), "KSA");
        assert_eq!(query.page(), 1);
    }
}
