//! Home page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use noble_paints_core::Locale;

use super::Layout;
use crate::db::ProductRepository;
use crate::filters;
use crate::middleware::{ActiveLocale, set_session_locale};
use crate::models::Product;
use crate::state::AppState;

/// Number of products in the "latest" strip.
const LATEST_COUNT: usize = 6;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub featured: Vec<Product>,
    pub latest: Vec<Product>,
}

/// Display the home page in the active locale.
#[instrument(skip(state, active), fields(locale = %active.locale))]
pub async fn home(State(state): State<AppState>, active: ActiveLocale) -> impl IntoResponse {
    render(&state, &active).await
}

/// Display the home page in English and remember the choice.
pub async fn home_en(
    State(state): State<AppState>,
    session: Session,
    active: ActiveLocale,
) -> impl IntoResponse {
    render_forced(&state, &session, active, Locale::En).await
}

/// Display the home page in Arabic and remember the choice.
pub async fn home_ar(
    State(state): State<AppState>,
    session: Session,
    active: ActiveLocale,
) -> impl IntoResponse {
    render_forced(&state, &session, active, Locale::Ar).await
}

async fn render_forced(
    state: &AppState,
    session: &Session,
    active: ActiveLocale,
    locale: Locale,
) -> HomeTemplate {
    if let Err(e) = set_session_locale(session, locale).await {
        tracing::warn!(error = %e, "Failed to remember locale in session");
    }
    let active = ActiveLocale { locale, ..active };
    render(state, &active).await
}

async fn render(state: &AppState, active: &ActiveLocale) -> HomeTemplate {
    let products = ProductRepository::new(state.pool());

    let featured = products
        .featured(&state.config().content.featured_product_ids, active.locale)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to load featured products");
            Vec::new()
        });

    let latest = products
        .latest(active.locale, LATEST_COUNT)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to load latest products");
            Vec::new()
        });

    HomeTemplate {
        layout: Layout::new(active),
        featured,
        latest,
    }
}
