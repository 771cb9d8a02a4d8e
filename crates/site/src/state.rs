//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::CategoriesCache;
use crate::config::SiteConfig;
use crate::services::{EmailService, Translator};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The categories cache lives here rather than
/// in a global so tests can build isolated instances.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    pool: PgPool,
    categories: CategoriesCache,
    email: Option<EmailService>,
    translator: Option<Translator>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Optional services that fail to initialize are logged and left out.
    #[must_use]
    pub fn new(config: SiteConfig, pool: PgPool) -> Self {
        let categories = CategoriesCache::new(
            config.content.categories_cache_ttl,
            config.content.excluded_category_id,
        );

        let email = config.email.as_ref().and_then(|email_config| {
            EmailService::new(email_config)
                .inspect_err(|e| tracing::error!(error = %e, "Failed to configure SMTP; contact form disabled"))
                .ok()
        });
        if email.is_none() {
            tracing::warn!("Email not configured; contact form submissions will fail");
        }

        let translator = config.translate.as_ref().and_then(|translate_config| {
            Translator::new(translate_config)
                .inspect_err(|e| tracing::error!(error = %e, "Failed to configure translation client"))
                .ok()
        });

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                categories,
                email,
                translator,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the categories cache.
    #[must_use]
    pub fn categories(&self) -> &CategoriesCache {
        &self.inner.categories
    }

    /// The mailer, when SMTP is configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }

    /// The translation client, when configured.
    #[must_use]
    pub fn translator(&self) -> Option<&Translator> {
        self.inner.translator.as_ref()
    }
}
