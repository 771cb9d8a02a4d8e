//! Locale-aware selection policy for products, catalogs and datasheets.
//!
//! The site crate turns the clauses of a [`ListingFilter`] into SQL and runs
//! featured/latest lookups through [`collect_fallback`].
//!
//! ## Invariants
//!
//! - Fallback never fabricates rows: with no match in any locale of the
//!   chain the result is empty.
//! - A collected id appears at most once, at its first-seen position.

use std::collections::HashSet;
use std::future::Future;

use crate::types::Locale;

/// A row that carries a locale code.
pub trait LocalizedContent {
    /// Primary key used for de-duplication and tie-breaking.
    fn content_id(&self) -> i32;

    /// Raw `lang` column, which may be empty or an unsupported code.
    fn lang(&self) -> Option<&str>;
}

/// Whether a raw filter value means "no filter".
///
/// Empty, `All` (any case), `null` and `undefined` are all sentinels; the
/// browser forms send every one of them.
#[must_use]
pub fn is_sentinel(raw: &str) -> bool {
    let value = raw.trim();
    value.is_empty()
        || value.eq_ignore_ascii_case("all")
        || value == "null"
        || value == "undefined"
}

fn filter_value(raw: Option<&str>) -> Option<String> {
    raw.filter(|v| !is_sentinel(v)).map(|v| v.trim().to_owned())
}

/// Whether rows must match the requested locale or may come from any locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleScope {
    /// Only rows whose `lang` equals the requested locale.
    Exact,
    /// Rows of every locale; the locale only drives ordering.
    Any,
}

/// One predicate of a listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterClause {
    Lang(Locale),
    Category(String),
    Country(String),
    /// Case-insensitive substring match on the name.
    NameContains(String),
}

/// Filters for a listing page, built from raw query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFilter {
    locale: Locale,
    scope: LocaleScope,
    category: Option<String>,
    country: Option<String>,
    search: Option<String>,
}

impl ListingFilter {
    /// A filter restricted to rows of `locale`.
    #[must_use]
    pub const fn new(locale: Locale) -> Self {
        Self {
            locale,
            scope: LocaleScope::Exact,
            category: None,
            country: None,
            search: None,
        }
    }

    /// A filter over every locale, ranked by relevance to `locale`.
    #[must_use]
    pub const fn any_locale(locale: Locale) -> Self {
        Self {
            locale,
            scope: LocaleScope::Any,
            category: None,
            country: None,
            search: None,
        }
    }

    #[must_use]
    pub fn category(mut self, raw: Option<&str>) -> Self {
        self.category = filter_value(raw);
        self
    }

    #[must_use]
    pub fn country(mut self, raw: Option<&str>) -> Self {
        self.country = filter_value(raw);
        self
    }

    /// Free-text name search. `All` is searchable text here, unlike the
    /// category and country sentinels.
    #[must_use]
    pub fn search(mut self, raw: Option<&str>) -> Self {
        self.search = raw
            .map(str::trim)
            .filter(|v| !v.is_empty() && *v != "undefined" && *v != "null")
            .map(str::to_owned);
        self
    }

    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    #[must_use]
    pub const fn scope(&self) -> LocaleScope {
        self.scope
    }

    /// Category echoed back into the filter form (`All` when unset).
    #[must_use]
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or("All")
    }

    /// Country echoed back into the filter form (`All` when unset).
    #[must_use]
    pub fn country_label(&self) -> &str {
        self.country.as_deref().unwrap_or("All")
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }

    /// Active clauses in evaluation order.
    #[must_use]
    pub fn clauses(&self) -> Vec<FilterClause> {
        let lang = match self.scope {
            LocaleScope::Exact => Some(FilterClause::Lang(self.locale)),
            LocaleScope::Any => None,
        };

        [
            lang,
            self.category.clone().map(FilterClause::Category),
            self.country.clone().map(FilterClause::Country),
            self.search.clone().map(FilterClause::NameContains),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Rows kept in first-seen order; an id already collected is skipped.
#[derive(Debug)]
struct FallbackCollector<T> {
    limit: usize,
    seen: HashSet<i32>,
    items: Vec<T>,
}

impl<T: LocalizedContent> FallbackCollector<T> {
    fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            seen: HashSet::new(),
            items: Vec::with_capacity(limit),
        }
    }

    fn is_full(&self) -> bool {
        self.items.len() >= self.limit
    }

    fn extend(&mut self, rows: impl IntoIterator<Item = T>) {
        for row in rows {
            if self.is_full() {
                break;
            }
            if self.seen.insert(row.content_id()) {
                self.items.push(row);
            }
        }
    }
}

/// Collect up to `limit` distinct rows across `chain`, one locale at a time.
///
/// `fetch` is called for each locale in order until the limit is reached;
/// later locales are not queried once it is.
///
/// # Errors
///
/// Returns the first error `fetch` produces.
pub async fn collect_fallback<T, E, F, Fut>(
    chain: &[Locale],
    limit: usize,
    mut fetch: F,
) -> Result<Vec<T>, E>
where
    T: LocalizedContent,
    F: FnMut(Locale) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let mut collector = FallbackCollector::with_limit(limit);
    for &locale in chain {
        if collector.is_full() {
            break;
        }
        collector.extend(fetch(locale).await?);
    }
    Ok(collector.items)
}

/// Reorder rows to follow `ids`, dropping rows whose id is not listed.
#[must_use]
pub fn order_by_id_list<T: LocalizedContent>(rows: Vec<T>, ids: &[i32]) -> Vec<T> {
    let mut slots: Vec<Option<T>> = rows.into_iter().map(Some).collect();
    ids.iter()
        .filter_map(|id| {
            slots
                .iter_mut()
                .find(|slot| slot.as_ref().is_some_and(|row| row.content_id() == *id))
                .and_then(Option::take)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Row {
        id: i32,
        lang: &'static str,
    }

    impl LocalizedContent for Row {
        fn content_id(&self) -> i32 {
            self.id
        }

        fn lang(&self) -> Option<&str> {
            Some(self.lang).filter(|l| !l.is_empty())
        }
    }

    const fn row(id: i32, lang: &'static str) -> Row {
        Row { id, lang }
    }

    fn ids(rows: &[Row]) -> Vec<i32> {
        rows.iter().map(|r| r.id).collect()
    }

    /// Run the fallback over an in-memory table, recording queried locales.
    async fn collect_from(table: &[Row], locale: Locale, limit: usize) -> (Vec<Row>, Vec<Locale>) {
        let mut queried = Vec::new();
        let rows = collect_fallback(&locale.fallback_chain(), limit, |lang| {
            queried.push(lang);
            let rows: Vec<Row> = table.iter().filter(|r| r.lang == lang.code()).cloned().collect();
            async move { Ok::<_, ()>(rows) }
        })
        .await
        .unwrap();
        (rows, queried)
    }

    #[test]
    fn test_sentinels() {
        for raw in ["", "  ", "All", "all", "ALL", "null", "undefined"] {
            assert!(is_sentinel(raw), "{raw:?} should be a sentinel");
        }
        assert!(!is_sentinel("Wood"));
    }

    #[test]
    fn test_clauses_skip_sentinels() {
        let filter = ListingFilter::new(Locale::Ar)
            .category(Some("All"))
            .country(Some("undefined"))
            .search(Some(""));
        assert_eq!(filter.clauses(), vec![FilterClause::Lang(Locale::Ar)]);
        assert_eq!(filter.category_label(), "All");

        let filter = ListingFilter::any_locale(Locale::Ar).category(Some(" Wood "));
        assert_eq!(filter.clauses(), vec![FilterClause::Category("Wood".to_owned())]);
    }

    #[test]
    fn test_search_keeps_all_as_text() {
        let filter = ListingFilter::any_locale(Locale::En).search(Some(" All "));
        assert_eq!(filter.clauses(), vec![FilterClause::NameContains("All".to_owned())]);
        assert_eq!(filter.search_term(), "All");
    }

    #[tokio::test]
    async fn test_fallback_to_default_locale_when_requested_is_empty() {
        let table = [row(3, "en"), row(2, "en")];
        let (got, queried) = collect_from(&table, Locale::Ar, 6).await;
        assert_eq!(ids(&got), vec![3, 2]);
        assert_eq!(queried, vec![Locale::Ar, Locale::En]);
    }

    #[tokio::test]
    async fn test_requested_locale_first_without_duplicates() {
        // The same id under both locales must only be taken once.
        let table = [row(5, "en"), row(4, "ar"), row(7, "ar"), row(4, "en"), row(1, "en")];
        let (got, _) = collect_from(&table, Locale::Ar, 10).await;
        assert_eq!(ids(&got), vec![4, 7, 5, 1]);
        assert!(got.iter().take(2).all(|r| r.lang == "ar"));
    }

    #[tokio::test]
    async fn test_full_requested_locale_skips_fallback_query() {
        let table = [row(9, "ar"), row(8, "ar"), row(7, "en")];
        let (got, queried) = collect_from(&table, Locale::Ar, 2).await;
        assert_eq!(ids(&got), vec![9, 8]);
        assert_eq!(queried, vec![Locale::Ar]);
    }

    #[tokio::test]
    async fn test_fallback_stops_at_limit() {
        let table = [row(9, "ar"), row(8, "en"), row(7, "en")];
        let (got, _) = collect_from(&table, Locale::Ar, 2).await;
        assert_eq!(ids(&got), vec![9, 8]);
    }

    #[tokio::test]
    async fn test_default_locale_has_no_fallback() {
        let table = [row(1, "ar"), row(2, "en")];
        let (got, queried) = collect_from(&table, Locale::En, 6).await;
        assert_eq!(ids(&got), vec![2]);
        assert_eq!(queried, vec![Locale::En]);
    }

    #[tokio::test]
    async fn test_no_rows_in_chain_yields_empty() {
        let table = [row(1, "fr")];
        let (got, _) = collect_from(&table, Locale::Ar, 6).await;
        assert!(got.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_error_is_returned() {
        let result: Result<Vec<Row>, &str> =
            collect_fallback(&Locale::Ar.fallback_chain(), 3, |lang| async move {
                if lang == Locale::Ar { Ok(vec![row(1, "ar")]) } else { Err("down") }
            })
            .await;
        assert_eq!(result, Err("down"));
    }

    #[test]
    fn test_order_by_id_list_follows_configured_order() {
        let rows = vec![row(20, "en"), row(68, "ar"), row(99, "en"), row(36, "en")];
        let ordered = order_by_id_list(rows, &[68, 71, 36, 20]);
        assert_eq!(ids(&ordered), vec![68, 36, 20]);
    }
}
