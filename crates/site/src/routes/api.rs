//! Public JSON endpoints used by the site scripts.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use noble_paints_core::{ListingFilter, Locale};

use crate::db::{ListingOrder, ProductRepository, SocialLinkRepository};
use crate::error::ApiError;
use crate::middleware::ActiveLocale;
use crate::models::{Product, SocialLink};
use crate::state::AppState;

/// `?lang=&limit=` of the products endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub lang: Option<String>,
    pub limit: Option<String>,
}

impl ProductsQuery {
    /// Requested locale, else the active one; unsupported codes become the default.
    fn locale(&self, active: Locale) -> Locale {
        match self.lang.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            Some(code) => Locale::normalize(Some(code)),
            None => active,
        }
    }

    /// Positive row cap; anything else means no cap.
    fn limit(&self) -> Option<i64> {
        self.limit
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|n| *n > 0)
    }
}

/// Products of one locale, newest first.
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn products(
    State(state): State<AppState>,
    active: ActiveLocale,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let filter = ListingFilter::new(query.locale(active.locale));
    let rows = ProductRepository::new(state.pool())
        .list(&filter, ListingOrder::IdDesc, query.limit())
        .await?;
    Ok(Json(rows))
}

/// Every footer social link.
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn social_icons(State(state): State<AppState>) -> Result<Json<Vec<SocialLink>>, ApiError> {
    let rows = SocialLinkRepository::new(state.pool()).list_all().await?;
    Ok(Json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(lang: Option<&str>, limit: Option<&str>) -> ProductsQuery {
        ProductsQuery {
            lang: lang.map(str::to_owned),
            limit: limit.map(str::to_owned),
        }
    }

    #[test]
    fn test_locale_prefers_query_then_active() {
        assert_eq!(query(Some("ar"), None).locale(Locale::En), Locale::Ar);
        assert_eq!(query(Some("fr"), None).locale(Locale::Ar), Locale::En);
        assert_eq!(query(None, None).locale(Locale::Ar), Locale::Ar);
    }

    #[test]
    fn test_limit_ignores_invalid_values() {
        assert_eq!(query(None, Some("5")).limit(), Some(5));
        assert_eq!(query(None, Some("0")).limit(), None);
        assert_eq!(query(None, Some("ten")).limit(), None);
        assert_eq!(query(None, None).limit(), None);
    }
}
