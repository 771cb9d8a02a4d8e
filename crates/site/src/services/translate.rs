//! Client for an optional machine translation endpoint.
//!
//! Used to backfill Arabic category names. The endpoint accepts
//! `{q, source, target, format, api_key?}` and answers `{translatedText}`.
//! Results are memoized for an hour.

use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use noble_paints_core::Locale;

use crate::config::TranslateConfig;

const CACHE_TTL: Duration = Duration::from_secs(3600);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from the translation endpoint.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the endpoint.
    #[error("Translation API error ({status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The endpoint answered without a usable translation.
    #[error("Empty translation")]
    Empty,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// Translation client with an in-process memo.
#[derive(Clone)]
pub struct Translator {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    cache: Cache<(Locale, Locale, String), String>,
}

impl Translator {
    /// Create a new translation client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &TranslateConfig) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            client,
            endpoint: config.api_url.clone(),
            api_key: config.api_key.as_ref().map(|k| k.expose_secret().to_owned()),
            cache,
        })
    }

    /// Translate `text` from `source` to `target`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or yields no text.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn translate(
        &self,
        text: &str,
        source: Locale,
        target: Locale,
    ) -> Result<String, TranslateError> {
        let text = text.trim();
        if text.is_empty() || source == target {
            return Ok(text.to_owned());
        }

        let key = (source, target, text.to_owned());
        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit);
        }

        let response = self
            .client
            .post(&self.endpoint)
            .json(&TranslateRequest {
                q: text,
                source: source.code(),
                target: target.code(),
                format: "text",
                api_key: self.api_key.as_deref(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::Api { status, body });
        }

        let translated = response.json::<TranslateResponse>().await?.translated_text;
        let translated = translated.trim();
        if translated.is_empty() {
            return Err(TranslateError::Empty);
        }

        let translated = translated.to_owned();
        self.cache.insert(key, translated.clone()).await;
        Ok(translated)
    }

    /// Best-effort translation; failures are logged and yield `None`.
    pub async fn try_translate(&self, text: &str, source: Locale, target: Locale) -> Option<String> {
        match self.translate(text, source, target).await {
            Ok(translated) => Some(translated),
            Err(e) => {
                tracing::warn!(error = %e, "Translation unavailable");
                None
            }
        }
    }
}
