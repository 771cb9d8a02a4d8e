//! Product detail, category and search pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::instrument;

use noble_paints_core::{ListingFilter, ProductId};

use super::{
    Layout, Listed, ListingQuery, PUBLIC_PAGE_SIZE, Pager, fallback_filter, listing_pager, or_empty,
    with_fallback,
};
use crate::db::content::FacetColumn;
use crate::db::{ListingOrder, ProductRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::ActiveLocale;
use crate::models::Product;
use crate::state::AppState;

/// Similar products shown under a product.
const SIMILAR_LIMIT: i64 = 6;

/// `?id=` of the product page.
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub id: Option<String>,
}

impl ProductQuery {
    fn product_id(&self) -> Option<ProductId> {
        self.id.as_deref()?.trim().parse().ok()
    }
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductTemplate {
    pub layout: Layout,
    pub product: Product,
    pub similar: Vec<Product>,
}

/// Display one product with others of its category.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the id is missing, unparseable or unknown.
#[instrument(skip(state, active))]
pub async fn show(
    State(state): State<AppState>,
    active: ActiveLocale,
    Query(query): Query<ProductQuery>,
) -> Result<ProductTemplate> {
    let id = query
        .product_id()
        .ok_or_else(|| AppError::NotFound("product".to_owned()))?;

    let products = ProductRepository::new(state.pool());
    let product = products
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let similar = or_empty(products.similar(&product, SIMILAR_LIMIT).await, "similar products");

    Ok(ProductTemplate {
        layout: Layout::new(&active),
        product,
        similar,
    })
}

/// Products of one category template.
#[derive(Template, WebTemplate)]
#[template(path = "products/category.html")]
pub struct CategoryProductsTemplate {
    pub layout: Layout,
    pub title: String,
    pub items: Vec<Product>,
}

/// Display the products of one category in the active locale.
#[instrument(skip(state, active))]
pub async fn by_category(
    State(state): State<AppState>,
    active: ActiveLocale,
    Path(category): Path<String>,
) -> CategoryProductsTemplate {
    let filter = ListingFilter::new(active.locale).category(Some(&category));
    let items = or_empty(
        ProductRepository::new(state.pool())
            .list(&filter, ListingOrder::LocaleRelevance(active.locale), None)
            .await,
        "category products",
    );

    CategoryProductsTemplate {
        layout: Layout::new(&active),
        title: category,
        items,
    }
}

/// Product search template.
#[derive(Template, WebTemplate)]
#[template(path = "products/search.html")]
pub struct ProductSearchTemplate {
    pub layout: Layout,
    pub form_action: &'static str,
    pub filter: ListingFilter,
    pub categories: Vec<String>,
    pub countries: Vec<String>,
    pub items: Vec<Product>,
    pub pager: Pager,
}

/// Filtered, paginated product search.
#[instrument(skip(state, active))]
pub async fn search(
    State(state): State<AppState>,
    active: ActiveLocale,
    Query(query): Query<ListingQuery>,
) -> ProductSearchTemplate {
    let products = ProductRepository::new(state.pool());
    let filter = query.filter(active.locale);
    let order = ListingOrder::LocaleRelevance(active.locale);
    let fallback = fallback_filter();

    let primary = products.page(&filter, order, query.page(), PUBLIC_PAGE_SIZE).await;
    let Listed {
        items,
        pagination,
        filter,
    } = with_fallback(
        "products",
        filter,
        primary,
        || products.page(&fallback, order, 1, PUBLIC_PAGE_SIZE),
    )
    .await;
    let categories = or_empty(
        products.facet(FacetColumn::Category, active.locale).await,
        "product categories",
    );
    let countries = or_empty(
        products.facet(FacetColumn::Country, active.locale).await,
        "product countries",
    );

    ProductSearchTemplate {
        layout: Layout::new(&active),
        form_action: "/productsSearch/",
        pager: listing_pager(&pagination, "/productsSearch/", &filter),
        filter,
        categories,
        countries,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_parsing() {
        let query = |id: Option<&str>| ProductQuery {
            id: id.map(str::to_owned),
        };
        assert_eq!(query(Some("68")).product_id(), Some(ProductId::new(68)));
        assert_eq!(query(Some(" 7 ")).product_id(), Some(ProductId::new(7)));
        assert_eq!(query(Some("abc")).product_id(), None);
        assert_eq!(query(None).product_id(), None);
    }
}
