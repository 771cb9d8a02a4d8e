//! Translation of [`ListingFilter`] clauses into SQL.
//!
//! All values are bound parameters; only the constant table and column
//! names of the calling repository are pushed as raw SQL.

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use noble_paints_core::{FilterClause, ListingFilter, Locale, Pagination};

use super::RepositoryError;

/// Row ordering for listing queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingOrder {
    /// Newest first.
    IdDesc,
    /// Locale relevance to the given locale, then newest first.
    LocaleRelevance(Locale),
}

/// Append `WHERE`/`AND` predicates for every active clause of `filter`.
pub fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ListingFilter) {
    for (index, clause) in filter.clauses().into_iter().enumerate() {
        builder.push(if index == 0 { " WHERE " } else { " AND " });
        push_clause(builder, clause);
    }
}

fn push_clause(builder: &mut QueryBuilder<'_, Postgres>, clause: FilterClause) {
    match clause {
        FilterClause::Lang(locale) => {
            builder.push("lang = ").push_bind(locale.code());
        }
        FilterClause::Category(category) => {
            builder.push("category = ").push_bind(category);
        }
        FilterClause::Country(country) => {
            builder.push("country = ").push_bind(country);
        }
        FilterClause::NameContains(term) => {
            builder
                .push("LOWER(name) LIKE ")
                .push_bind(like_pattern(&term))
                .push(" ESCAPE '\\'");
        }
    }
}

/// Case-folded `%term%` pattern with LIKE metacharacters escaped.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Append an `ORDER BY` clause.
pub fn push_order(builder: &mut QueryBuilder<'_, Postgres>, order: ListingOrder) {
    match order {
        ListingOrder::IdDesc => {
            builder.push(" ORDER BY id DESC");
        }
        ListingOrder::LocaleRelevance(locale) => {
            builder.push(" ORDER BY CASE");
            for candidate in Locale::SUPPORTED {
                builder
                    .push(" WHEN LOWER(TRIM(lang)) = ")
                    .push_bind(candidate.code())
                    .push(" THEN ")
                    .push(locale.priority_of(Some(candidate.code())));
            }
            builder
                .push(" ELSE ")
                .push(Locale::unranked_priority())
                .push(" END, id DESC");
        }
    }
}

/// A listing query over one table.
#[derive(Debug, Clone, Copy)]
pub struct Listing<'q> {
    /// Table name.
    pub table: &'q str,
    /// Column list for the `SELECT`.
    pub columns: &'q str,
}

impl Listing<'_> {
    /// `SELECT ... FROM table WHERE ... ORDER BY ...` without pagination.
    #[must_use]
    pub fn select(&self, filter: &ListingFilter, order: ListingOrder) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM {}", self.columns, self.table));
        push_filter(&mut builder, filter);
        push_order(&mut builder, order);
        builder
    }

    /// `SELECT COUNT(*) FROM table WHERE ...`.
    #[must_use]
    pub fn count(&self, filter: &ListingFilter) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", self.table));
        push_filter(&mut builder, filter);
        builder
    }

    /// Fetch every matching row, optionally capped at `limit`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn fetch_all<T>(
        &self,
        pool: &PgPool,
        filter: &ListingFilter,
        order: ListingOrder,
        limit: Option<i64>,
    ) -> Result<Vec<T>, RepositoryError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut builder = self.select(filter, order);
        if let Some(limit) = limit {
            builder.push(" LIMIT ").push_bind(limit);
        }
        Ok(builder.build_query_as::<T>().fetch_all(pool).await?)
    }

    /// Count matching rows, clamp `page` and fetch that page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    pub async fn fetch_page<T>(
        &self,
        pool: &PgPool,
        filter: &ListingFilter,
        order: ListingOrder,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<T>, Pagination), RepositoryError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let total = self
            .count(filter)
            .build_query_scalar::<i64>()
            .fetch_one(pool)
            .await?;
        let pagination = Pagination::new(page, per_page, u64::try_from(total).unwrap_or(0));

        let mut builder = self.select(filter, order);
        builder
            .push(" LIMIT ")
            .push_bind(pagination.sql_limit())
            .push(" OFFSET ")
            .push_bind(pagination.sql_offset());
        let rows = builder.build_query_as::<T>().fetch_all(pool).await?;

        Ok((rows, pagination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOGS: Listing<'static> = Listing {
        table: "catalogs",
        columns: "id, name",
    };

    #[test]
    fn test_no_clauses_no_where() {
        let builder = CATALOGS.select(&ListingFilter::any_locale(Locale::En), ListingOrder::IdDesc);
        assert_eq!(builder.sql(), "SELECT id, name FROM catalogs ORDER BY id DESC");
    }

    #[test]
    fn test_clauses_folded_in_order() {
        let filter = ListingFilter::new(Locale::Ar)
            .category(Some("Wood"))
            .country(Some("All"))
            .search(Some("primer"));
        let builder = CATALOGS.count(&filter);
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM catalogs WHERE lang = $1 AND category = $2 \
             AND LOWER(name) LIKE $3 ESCAPE '\\'"
        );
    }

    #[test]
    fn test_single_clause_each() {
        let cases = [
            (ListingFilter::any_locale(Locale::En).category(Some("Wood")), " WHERE category = $1"),
            (ListingFilter::any_locale(Locale::En).country(Some("KSA")), " WHERE country = $1"),
            (ListingFilter::any_locale(Locale::En).search(Some("x")), " WHERE LOWER(name) LIKE $1 ESCAPE '\\'"),
            (ListingFilter::new(Locale::En), " WHERE lang = $1"),
        ];
        for (filter, expected) in cases {
            let mut builder = QueryBuilder::<Postgres>::new("");
            push_filter(&mut builder, &filter);
            assert_eq!(builder.sql(), expected);
        }
    }

    #[test]
    fn test_locale_relevance_order() {
        let mut builder = QueryBuilder::<Postgres>::new("");
        push_order(&mut builder, ListingOrder::LocaleRelevance(Locale::Ar));
        assert_eq!(
            builder.sql(),
            " ORDER BY CASE WHEN LOWER(TRIM(lang)) = $1 THEN 1 \
             WHEN LOWER(TRIM(lang)) = $2 THEN 0 ELSE 2 END, id DESC"
        );
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("Primer"), "%primer%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
