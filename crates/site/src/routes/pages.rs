//! Static informational pages.
//!
//! These pages carry no data beyond the shared layout; their content lives
//! entirely in the templates.

use askama::Template;
use askama_web::WebTemplate;

use super::Layout;
use crate::filters;
use crate::middleware::ActiveLocale;

macro_rules! static_page {
    ($(#[$meta:meta])* $handler:ident, $template:ident, $path:tt) => {
        #[derive(Template, WebTemplate)]
        #[template(path = $path)]
        pub struct $template {
            pub layout: Layout,
        }

        $(#[$meta])*
        pub async fn $handler(active: ActiveLocale) -> $template {
            $template {
                layout: Layout::new(&active),
            }
        }
    };
}

static_page!(
    /// Company profile.
    about, AboutTemplate, "pages/about.html"
);
static_page!(
    /// Paint quantity calculator.
    calculator, CalculatorTemplate, "pages/calculator.html"
);
static_page!(
    /// Social media channels.
    social_media, SocialMediaTemplate, "pages/social.html"
);
static_page!(
    /// Product range overview; the grid is filled from `/api/categories/`.
    products, ProductsTemplate, "pages/products.html"
);
static_page!(
    /// Store locations.
    find_store, FindStoreTemplate, "pages/locations.html"
);
static_page!(
    /// Color collections.
    colors, ColorsTemplate, "pages/colors.html"
);
static_page!(
    /// Contact form; submits to `/sendC/`.
    contact, ContactTemplate, "pages/contact.html"
);
static_page!(
    /// RAL color chart.
    ral_colors, RalColorsTemplate, "pages/ral_colors.html"
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
        routing::get,
    };
    use noble_paints_core::Locale;
    use tower::ServiceExt;

    use super::*;

    #[test]
    fn test_static_page_renders_in_arabic() {
        let active = ActiveLocale {
            locale: Locale::Ar,
            target: "/about/".to_owned(),
        };
        let html = AboutTemplate {
            layout: Layout::new(&active),
        }
        .render()
        .unwrap();
        assert!(html.contains(r#"dir="rtl""#));
        assert!(html.contains("lang=en"));
    }

    #[tokio::test]
    async fn test_lang_query_selects_locale_without_session() {
        let app = Router::new().route("/contact/", get(contact));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/contact/?lang=ar")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains(r#"lang="ar""#));
    }
}
