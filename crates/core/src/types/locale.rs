//! Supported display languages.
//!
//! ## Invariants
//!
//! - [`Locale::SUPPORTED`] is the declared order used for relevance ranking.
//! - [`Locale::DEFAULT`] is the fallback for unknown or missing codes.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// A locale code that is not in the supported set.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported locale: {0:?}")]
pub struct LocaleError(pub String);

/// A supported display language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English (default).
    #[default]
    En,
    /// Arabic.
    Ar,
}

impl Locale {
    /// Locale used when the requested one is unsupported.
    pub const DEFAULT: Self = Self::En;

    /// Supported locales in declared order.
    pub const SUPPORTED: [Self; 2] = [Self::En, Self::Ar];

    /// Short code stored in the `lang` column.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    /// Text direction for the `dir` attribute.
    #[must_use]
    pub const fn direction(self) -> &'static str {
        match self {
            Self::En => "ltr",
            Self::Ar => "rtl",
        }
    }

    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::En)
    }

    /// Parse an exact locale code. Surrounding whitespace and case are ignored.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "ar" => Some(Self::Ar),
            _ => None,
        }
    }

    /// Resolve a requested code, falling back to [`Locale::DEFAULT`].
    #[must_use]
    pub fn normalize(candidate: Option<&str>) -> Self {
        candidate.and_then(Self::parse).unwrap_or(Self::DEFAULT)
    }

    /// Locales to search, in order, when rows for `self` are insufficient.
    #[must_use]
    pub fn fallback_chain(self) -> Vec<Self> {
        if self.is_default() {
            vec![self]
        } else {
            vec![self, Self::DEFAULT]
        }
    }

    /// Supported locales other than `self`, in declared order.
    fn others(self) -> impl Iterator<Item = Self> {
        Self::SUPPORTED.into_iter().filter(move |l| *l != self)
    }

    /// Relevance bucket of a row's `lang` value when `self` is requested.
    ///
    /// `0` for an exact match, `1..` for the other supported locales in
    /// declared order, and [`Locale::unranked_priority`] for empty or
    /// unrecognized values.
    #[must_use]
    pub fn priority_of(self, lang: Option<&str>) -> usize {
        let Some(lang) = lang.and_then(Self::parse) else {
            return Self::unranked_priority();
        };
        if lang == self {
            return 0;
        }
        self.others()
            .position(|l| l == lang)
            .map_or(Self::unranked_priority(), |p| p + 1)
    }

    /// Bucket shared by rows whose locale is empty or unsupported.
    #[must_use]
    pub const fn unranked_priority() -> usize {
        Self::SUPPORTED.len()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| LocaleError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_falls_back_to_default() {
        assert_eq!(Locale::normalize(Some("ar")), Locale::Ar);
        assert_eq!(Locale::normalize(Some(" AR ")), Locale::Ar);
        assert_eq!(Locale::normalize(Some("fr")), Locale::En);
        assert_eq!(Locale::normalize(Some("")), Locale::En);
        assert_eq!(Locale::normalize(None), Locale::En);
    }

    #[test]
    fn test_fallback_chain() {
        assert_eq!(Locale::En.fallback_chain(), vec![Locale::En]);
        assert_eq!(Locale::Ar.fallback_chain(), vec![Locale::Ar, Locale::En]);
    }

    #[test]
    fn test_priority_buckets() {
        assert_eq!(Locale::Ar.priority_of(Some("ar")), 0);
        assert_eq!(Locale::Ar.priority_of(Some("en")), 1);
        assert_eq!(Locale::Ar.priority_of(Some("fr")), 2);
        assert_eq!(Locale::Ar.priority_of(Some("")), 2);
        assert_eq!(Locale::Ar.priority_of(None), 2);

        assert_eq!(Locale::En.priority_of(Some("en")), 0);
        assert_eq!(Locale::En.priority_of(Some("ar")), 1);
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Locale::Ar).ok().as_deref(), Some("\"ar\""));
        assert!("de".parse::<Locale>().is_err());
    }
}
