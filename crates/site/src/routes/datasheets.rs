//! Public technical datasheet listing.

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
use crate::db::{DatasheetRepository, ListingOrder};
use crate::filters;
use crate::middleware::ActiveLocale;
use crate::models::Datasheet;
use crate::state::AppState;

const PATH: &str = "/TechnicalDatasheets/";

/// Datasheet listing template.
#[derive(Template, WebTemplate)]
#[template(path = "datasheets.html")]
pub struct DatasheetsTemplate {
    pub layout: Layout,
    pub form_action: &'static str,
    pub filter: ListingFilter,
    pub categories: Vec<String>,
    pub countries: Vec<String>,
    pub items: Vec<Datasheet>,
    pub pager: Pager,
}

/// Filtered, paginated datasheets of the active locale.
#[instrument(skip(state, active), fields(locale = %active.locale))]
pub async fn index(
    State(state): State<AppState>,
    active: ActiveLocale,
    Query(query): Query<ListingQuery>,
) -> DatasheetsTemplate {
    let datasheets = DatasheetRepository::new(state.pool());
    let filter = query.filter(active.locale);
    let order = ListingOrder::LocaleRelevance(active.locale);
    let fallback = fallback_filter();

    let primary = datasheets.page(&filter, order, query.page(), PUBLIC_PAGE_SIZE).await;
    let Listed {
        items,
        pagination,
        filter,
    } = with_fallback(
        "datasheets",
        filter,
        primary,
        || datasheets.page(&fallback, order, 1, PUBLIC_PAGE_SIZE),
    )
    .await;
    let categories = or_empty(
        datasheets.facet(FacetColumn::Category, active.locale).await,
        "datasheet categories",
    );
    let countries = or_empty(
        datasheets.facet(FacetColumn::Country, active.locale).await,
        "datasheet countries",
    );

    DatasheetsTemplate {
        layout: Layout::new(&active),
        form_action: PATH,
        pager: listing_pager(&pagination, PATH, &filter),
        filter,
        categories,
        countries,
        items,
    }
}
