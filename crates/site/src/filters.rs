//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::Datelike;

fn fill_year(text: &str, year: i32) -> String {
    text.replace("{year}", &year.to_string())
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    Ok(chrono::Utc::now().year())
}

/// Substitutes the current year for `{year}`.
///
/// Usage in templates: `{{ i18n.t("footer.rights")|with_year }}`
#[askama::filter_fn]
pub fn with_year(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(fill_year(&value.to_string(), chrono::Utc::now().year()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_year() {
        assert_eq!(
            fill_year("© {year} Noble Paints. All rights reserved.", 2026),
            "© 2026 Noble Paints. All rights reserved."
        );
        assert_eq!(fill_year("no placeholder", 2026), "no placeholder");
    }
}
