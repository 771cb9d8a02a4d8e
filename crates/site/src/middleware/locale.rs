//! Active locale resolution.
//!
//! The locale of a request is the `lang` query parameter when supported,
//! else the locale remembered in the session, else English. The resolved
//! value is written back to the session so later pages keep it.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use noble_paints_core::Locale;

use crate::models::session_keys;

/// The locale a page renders in, plus the request target for language links.
#[derive(Debug, Clone)]
pub struct ActiveLocale {
    pub locale: Locale,
    /// Path and query of the request, used to build language switch links.
    pub target: String,
}

impl ActiveLocale {
    /// `target` with its `lang` parameter replaced by `locale`.
    #[must_use]
    pub fn switch_url(&self, locale: Locale) -> String {
        switch_lang(&self.target, locale)
    }
}

/// The `lang` query parameter, if present and supported.
fn query_locale(query: Option<&str>) -> Option<Locale> {
    let query = query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "lang")
        .and_then(|(_, value)| Locale::parse(&value))
}

/// Replace or append the `lang` parameter of a path-and-query string.
#[must_use]
pub fn switch_lang(target: &str, locale: Locale) -> String {
    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if key != "lang" {
            serializer.append_pair(&key, &value);
        }
    }
    serializer.append_pair("lang", locale.code());
    format!("{path}?{}", serializer.finish())
}

impl<S> FromRequestParts<S> for ActiveLocale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let target = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_owned(), ToString::to_string);
        let requested = query_locale(parts.uri.query());
        let session = parts.extensions.get::<Session>();

        let stored = match session {
            Some(session) => session
                .get::<String>(session_keys::LANG)
                .await
                .ok()
                .flatten()
                .and_then(|code| Locale::parse(&code)),
            None => None,
        };

        let locale = requested.or(stored).unwrap_or_default();

        if let Some(session) = session
            && stored != Some(locale)
            && let Err(e) = set_session_locale(session, locale).await
        {
            tracing::warn!(error = %e, "Failed to remember locale in session");
        }

        Ok(Self { locale, target })
    }
}

/// Remember `locale` for later requests of this session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_session_locale(
    session: &Session,
    locale: Locale,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::LANG, locale.code()).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;

    #[test]
    fn test_query_locale() {
        assert_eq!(query_locale(Some("page=2&lang=ar")), Some(Locale::Ar));
        assert_eq!(query_locale(Some("lang=fr")), None);
        assert_eq!(query_locale(None), None);
    }

    #[test]
    fn test_switch_lang_replaces_existing_param() {
        assert_eq!(
            switch_lang("/catalogs/?lang=en&page=2", Locale::Ar),
            "/catalogs/?page=2&lang=ar"
        );
        assert_eq!(switch_lang("/news/", Locale::En), "/news/?lang=en");
    }

    #[tokio::test]
    async fn test_resolves_query_then_default_without_session() {
        let (mut parts, ()) = Request::builder()
            .uri("/catalogs/?lang=ar&search=primer")
            .body(())
            .unwrap()
            .into_parts();
        let active = ActiveLocale::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(active.locale, Locale::Ar);
        assert_eq!(active.target, "/catalogs/?lang=ar&search=primer");

        let (mut parts, ()) = Request::builder().uri("/").body(()).unwrap().into_parts();
        let active = ActiveLocale::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(active.locale, Locale::En);
    }
}
