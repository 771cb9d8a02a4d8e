//! Control panel routes.
//!
//! Every handler requires a signed-in admin. Listing pages render HTML;
//! write endpoints answer JSON and are called by the control panel scripts.
//!
//! # Route Structure
//!
//! ```text
//! GET  /, /categories/               - Categories
//! GET  /products/                    - Products (all locales)
//! GET  /catalogs/                    - Catalogs (all locales)
//! GET  /TechnicalDatasheets/         - Datasheets (all locales)
//! GET  /news/                        - News of one locale
//! GET  /certificates/, /approvals/   - Documents
//! GET  /socialIcons/                 - Footer social links
//!
//! POST            /{entity}/add/       - Create (201 with id)
//! POST            /{entity}/edit/{id}/ - Partial update
//! DELETE|POST|GET /{entity}/del/{id}/  - Delete
//! GET             add/ and edit/       - 405 JSON
//! ```

pub mod catalogs;
pub mod categories;
pub mod datasheets;
pub mod documents;
pub mod news;
pub mod products;
pub mod social;

use std::str::FromStr;

use axum::{
    Router,
    extract::Multipart,
    routing::{get, post},
};
use serde::{Deserialize, de::DeserializeOwned};
use tower_sessions::Session;

use noble_paints_core::{Pagination, parse_page};

use super::{Layout, Pager};
use crate::db::uploads::NewUpload;
use crate::error::ApiError;
use crate::middleware::{ActiveLocale, RequireAdminAuth, take_flash};
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Rows per page when `show` is absent or invalid.
pub const DEFAULT_SHOW: u32 = 10;

const MAX_SHOW: u32 = 200;

/// `?page=&show=&lang=` of the listing pages.
#[derive(Debug, Default, Deserialize)]
pub struct AdminListQuery {
    pub page: Option<String>,
    pub show: Option<String>,
    pub lang: Option<String>,
}

impl AdminListQuery {
    #[must_use]
    pub fn page(&self) -> u32 {
        parse_page(self.page.as_deref())
    }

    /// Rows per page, defaulting to [`DEFAULT_SHOW`].
    #[must_use]
    pub fn show(&self) -> u32 {
        self.show
            .as_deref()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .map_or(DEFAULT_SHOW, |n| n.min(MAX_SHOW))
    }
}

/// Values shared by every listing page.
pub struct Chrome {
    pub layout: Layout,
    pub admin: CurrentAdmin,
    /// Translation key of the active section.
    pub section: &'static str,
    pub show: u32,
    pub pager: Pager,
}

impl Chrome {
    /// Chrome for a listing at `path`, consuming any pending flash message.
    pub async fn new(
        session: &Session,
        active: &ActiveLocale,
        admin: CurrentAdmin,
        section: &'static str,
        path: &str,
        pagination: &Pagination,
        show: u32,
    ) -> Self {
        let show_param = show.to_string();
        Self {
            layout: Layout::new(active).with_flash(take_flash(session).await),
            admin,
            section,
            show,
            pager: Pager::new(pagination, path, &[("show", show_param.as_str())]),
        }
    }
}

/// Defines a listing template carrying [`Chrome`] fields plus `items`.
macro_rules! admin_listing {
    ($name:ident, $path:tt, $item:ty $(, $field:ident: $ty:ty)*) => {
        #[derive(askama::Template, askama_web::WebTemplate)]
        #[template(path = $path)]
        pub struct $name {
            pub layout: $crate::routes::Layout,
            pub admin: $crate::models::CurrentAdmin,
            pub section: &'static str,
            pub show: u32,
            pub pager: $crate::routes::Pager,
            pub items: Vec<$item>,
            $(pub $field: $ty,)*
        }

        impl $name {
            fn from_chrome(chrome: $crate::routes::admin::Chrome, items: Vec<$item> $(, $field: $ty)*) -> Self {
                Self {
                    layout: chrome.layout,
                    admin: chrome.admin,
                    section: chrome.section,
                    show: chrome.show,
                    pager: chrome.pager,
                    items,
                    $($field,)*
                }
            }
        }
    };
}
pub(crate) use admin_listing;

/// Edited value of a field; absent, blank and `undefined` keep the stored one.
#[must_use]
pub fn edit_value(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty() && v != "undefined")
}

/// Required value of a new row, trimmed.
#[must_use]
pub fn required(raw: Option<&String>) -> Option<String> {
    raw.map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Parse the JSON body of a write endpoint; an unreadable body counts as `{}`.
#[must_use]
pub fn json_body<T: DeserializeOwned + Default>(body: &[u8]) -> T {
    serde_json::from_slice(body).unwrap_or_default()
}

/// Path id of `entity`; an unparseable id is treated as unknown.
///
/// # Errors
///
/// Returns `ApiError::NotFound` with `"<entity> not found."`.
pub fn parse_id<T: FromStr>(raw: &str, entity: &'static str) -> Result<T, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::NotFound(format!("{entity} not found.")))
}

/// The `data` and `file` parts of a multipart write.
#[derive(Debug, Default)]
pub struct MultipartPayload {
    /// Raw JSON of the `data` field.
    pub data: Option<String>,
    /// Uploaded `file`, when one with a name was sent.
    pub file: Option<NewUpload>,
}

impl MultipartPayload {
    /// Read the form; unknown parts are skipped.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadRequest` if the body is not valid multipart.
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut payload = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?
        {
            match field.name() {
                Some("data") => {
                    payload.data = Some(
                        field
                            .text()
                            .await
                            .map_err(|e| ApiError::BadRequest(e.body_text()))?,
                    );
                }
                Some("file") => {
                    let filename = field
                        .file_name()
                        .map(str::trim)
                        .filter(|n| !n.is_empty() && *n != "undefined")
                        .map(str::to_owned);
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                    if let Some(filename) = filename {
                        payload.file = Some(NewUpload {
                            filename,
                            data: data.to_vec(),
                        });
                    }
                }
                _ => {}
            }
        }
        Ok(payload)
    }

    /// Decode the `data` JSON.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadRequest` with `missing` when `data` is absent or
    /// blank and with `invalid` when it does not parse.
    pub fn data<T: DeserializeOwned>(
        &self,
        missing: &'static str,
        invalid: &'static str,
    ) -> Result<T, ApiError> {
        let raw = self
            .data
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest(missing.to_owned()))?;
        serde_json::from_str(raw).map_err(|_| ApiError::BadRequest(invalid.to_owned()))
    }
}

/// `GET` on a write endpoint.
pub async fn method_not_allowed(_admin: RequireAdminAuth) -> ApiError {
    ApiError::MethodNotAllowed
}

/// Create the control panel router, nested under `/ControlPanel`.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Categories
        .route("/", get(categories::index))
        .route("/categories/", get(categories::index))
        .route("/categories/add/", post(categories::add).get(method_not_allowed))
        .route("/categories/edit/{id}/", post(categories::edit).get(method_not_allowed))
        .route(
            "/categories/del/{id}/",
            get(categories::remove).post(categories::remove).delete(categories::remove),
        )
        // Products
        .route("/products/", get(products::index))
        .route("/products/add/", post(products::add).get(method_not_allowed))
        .route("/products/edit/{id}/", post(products::edit).get(method_not_allowed))
        .route(
            "/products/del/{id}/",
            get(products::remove).post(products::remove).delete(products::remove),
        )
        // Catalogs
        .route("/catalogs/", get(catalogs::index))
        .route("/catalogs/add/", post(catalogs::add).get(method_not_allowed))
        .route("/catalogs/edit/{id}/", post(catalogs::edit).get(method_not_allowed))
        .route(
            "/catalogs/del/{id}/",
            get(catalogs::remove).post(catalogs::remove).delete(catalogs::remove),
        )
        // Technical datasheets
        .route("/TechnicalDatasheets/", get(datasheets::index))
        .route("/TechnicalDatasheets/add/", post(datasheets::add).get(method_not_allowed))
        .route(
            "/TechnicalDatasheets/edit/{id}/",
            post(datasheets::edit).get(method_not_allowed),
        )
        .route(
            "/TechnicalDatasheets/del/{id}/",
            get(datasheets::remove).post(datasheets::remove).delete(datasheets::remove),
        )
        // News
        .route("/news/", get(news::index))
        .route("/news/add/", post(news::add).get(method_not_allowed))
        .route("/news/edit/{id}/", post(news::edit).get(method_not_allowed))
        .route(
            "/news/del/{id}/",
            get(news::remove).post(news::remove).delete(news::remove),
        )
        // Certificates
        .route("/certificates/", get(documents::certificates))
        .route("/certificates/add/", post(documents::add_certificate).get(method_not_allowed))
        .route(
            "/certificates/edit/{id}/",
            post(documents::edit_certificate).get(method_not_allowed),
        )
        .route(
            "/certificates/del/{id}/",
            get(documents::remove_certificate)
                .post(documents::remove_certificate)
                .delete(documents::remove_certificate),
        )
        // Approvals
        .route("/approvals/", get(documents::approvals))
        .route("/approvals/add/", post(documents::add_approval).get(method_not_allowed))
        .route(
            "/approvals/edit/{id}/",
            post(documents::edit_approval).get(method_not_allowed),
        )
        .route(
            "/approvals/del/{id}/",
            get(documents::remove_approval)
                .post(documents::remove_approval)
                .delete(documents::remove_approval),
        )
        // Social icons
        .route("/socialIcons/", get(social::index))
        .route("/socialIcons/add/", post(social::add).get(method_not_allowed))
        .route("/socialIcons/edit/{id}/", post(social::edit).get(method_not_allowed))
        .route(
            "/socialIcons/del/{id}/",
            get(social::remove).post(social::remove).delete(social::remove),
        )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use noble_paints_core::ProductId;
    use tower::ServiceExt;

    use super::*;

    fn write_endpoint() -> Router {
        Router::new().route("/products/add/", get(method_not_allowed))
    }

    #[tokio::test]
    async fn test_get_on_write_endpoint_needs_sign_in() {
        let response = write_endpoint()
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/products/add/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/login/?next=%2Fproducts%2Fadd%2F"
        );
    }

    #[test]
    fn test_edit_value_skips_placeholders() {
        assert_eq!(edit_value(None), None);
        assert_eq!(edit_value(Some("  ".to_owned())), None);
        assert_eq!(edit_value(Some("undefined".to_owned())), None);
        assert_eq!(edit_value(Some(" Primer ".to_owned())), Some("Primer".to_owned()));
    }

    #[test]
    fn test_show_defaults_and_caps() {
        let query = |show: Option<&str>| AdminListQuery {
            show: show.map(str::to_owned),
            ..AdminListQuery::default()
        };
        assert_eq!(query(None).show(), DEFAULT_SHOW);
        assert_eq!(query(Some("0")).show(), DEFAULT_SHOW);
        assert_eq!(query(Some("25")).show(), 25);
        assert_eq!(query(Some("100000")).show(), MAX_SHOW);
    }

    #[test]
    fn test_parse_id_unknown_is_not_found() {
        let id: ProductId = parse_id(" 12 ", "Product").unwrap();
        assert_eq!(id, ProductId::new(12));

        let error = parse_id::<ProductId>("abc", "Product").unwrap_err();
        assert_eq!(error.to_string(), "Product not found.");
    }

    #[test]
    fn test_payload_data_errors() {
        #[derive(Debug, Deserialize)]
        struct Data {
            name: String,
        }

        let missing = MultipartPayload::default();
        let error = missing.data::<Data>("Missing data.", "Invalid data.").unwrap_err();
        assert_eq!(error.to_string(), "Missing data.");

        let invalid = MultipartPayload {
            data: Some("{not json".to_owned()),
            file: None,
        };
        let error = invalid.data::<Data>("Missing data.", "Invalid data.").unwrap_err();
        assert_eq!(error.to_string(), "Invalid data.");

        let valid = MultipartPayload {
            data: Some(r#"{"name":"Primer"}"#.to_owned()),
            file: None,
        };
        assert_eq!(valid.data::<Data>("m", "i").unwrap().name, "Primer");
    }
}
