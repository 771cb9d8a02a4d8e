//! Public catalog listing.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use tracing::instrument;

use noble_paints_core::ListingFilter;

use super::{
    Layout, Listed, ListingQuery, PUBLIC_PAGE_SIZE, Pager, fallback_filter, listing_pager, or_empty,
    with_fallback,
};
use crate::db::content::FacetColumn;
use crate::db::{CatalogRepository, ListingOrder};
use crate::filters;
use crate::middleware::ActiveLocale;
use crate::models::Catalog;
use crate::state::AppState;

const PATH: &str = "/catalogs/";

/// Catalog listing template.
#[derive(Template, WebTemplate)]
#[template(path = "catalogs.html")]
pub struct CatalogsTemplate {
    pub layout: Layout,
    pub form_action: &'static str,
    pub filter: ListingFilter,
    pub categories: Vec<String>,
    pub countries: Vec<String>,
    pub items: Vec<Catalog>,
    pub pager: Pager,
}

/// Filtered, paginated catalogs of the active locale.
///
/// Storage failures degrade to a default-locale first page, then to an
/// empty listing; the page itself always renders.
#[instrument(skip(state, active), fields(locale = %active.locale))]
pub async fn index(
    State(state): State<AppState>,
    active: ActiveLocale,
    Query(query): Query<ListingQuery>,
) -> CatalogsTemplate {
    let catalogs = CatalogRepository::new(state.pool());
    let filter = query.filter(active.locale);
    let order = ListingOrder::LocaleRelevance(active.locale);
    let fallback = fallback_filter();

    let primary = catalogs.page(&filter, order, query.page(), PUBLIC_PAGE_SIZE).await;
    let Listed {
        items,
        pagination,
        filter,
    } = with_fallback(
        "catalogs",
        filter,
        primary,
        || catalogs.page(&fallback, order, 1, PUBLIC_PAGE_SIZE),
    )
    .await;
    let categories = or_empty(
        catalogs.facet(FacetColumn::Category, active.locale).await,
        "catalog categories",
    );
    let countries = or_empty(
        catalogs.facet(FacetColumn::Country, active.locale).await,
        "catalog countries",
    );

    CatalogsTemplate {
        layout: Layout::new(&active),
        form_action: PATH,
        pager: listing_pager(&pagination, PATH, &filter),
        filter,
        categories,
        countries,
        items,
    }
}
