//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SITE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `SITE_HOST` - Bind address (default: 127.0.0.1)
//! - `SITE_PORT` - Listen port (default: 3000)
//! - `SITE_BASE_URL` - Public URL (default: `http://localhost:3000`)
//! - `CATEGORIES_CACHE_TTL_SECS` - Categories cache lifetime (default: 300)
//! - `EXCLUDED_CATEGORY_ID` - Category hidden from public listings (default: 29)
//! - `FEATURED_PRODUCT_IDS` - Comma-separated product ids for the home page
//! - `MAX_UPLOAD_BYTES` - Request body limit for uploads (default: 100 MiB)
//! - `ADMIN_INITIAL_USERNAME` - Bootstrap admin username (default: admin)
//! - `ADMIN_INITIAL_PASSWORD` - Bootstrap admin password
//! - `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD`, `SMTP_IMPLICIT_TLS`,
//!   `MAIL_FROM`, `CONTACT_RECIPIENT` - Contact form mail delivery (enabled when `SMTP_HOST` is set)
//! - `TRANSLATE_API_URL`, `TRANSLATE_API_KEY` - Translation service for Arabic backfill
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//! - `LOG_FORMAT` - `json` for JSON logs, anything else for text

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use noble_paints_core::{CategoryId, ProductId};

const DEFAULT_FEATURED_PRODUCT_IDS: &str = "68,71,78,80,36,20,113,64,104,76";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Site application configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Content selection settings
    pub content: ContentConfig,
    /// Default admin account created at startup
    pub admin: AdminBootstrapConfig,
    /// SMTP settings, absent when mail is not configured
    pub email: Option<EmailConfig>,
    /// Translation service, absent when not configured
    pub translate: Option<TranslateConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// Log output format
    pub log_format: LogFormat,
}

/// Content selection and caching settings.
#[derive(Debug, Clone)]
pub struct ContentConfig {
    pub categories_cache_ttl: Duration,
    pub excluded_category_id: CategoryId,
    /// Home page featured products, in display order
    pub featured_product_ids: Vec<ProductId>,
    pub max_upload_bytes: usize,
}

/// Bootstrap admin account.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct AdminBootstrapConfig {
    pub username: String,
    pub password: Option<SecretString>,
}

impl std::fmt::Debug for AdminBootstrapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrapConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Email (SMTP) configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP authentication username
    pub smtp_username: Option<String>,
    /// SMTP authentication password
    pub smtp_password: Option<SecretString>,
    /// Use TLS from the first byte (port 465) instead of STARTTLS
    pub implicit_tls: bool,
    /// Email sender address (From header)
    pub from_address: String,
    /// Recipient of contact form notifications
    pub contact_recipient: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("implicit_tls", &self.implicit_tls)
            .field("from_address", &self.from_address)
            .field("contact_recipient", &self.contact_recipient)
            .finish()
    }
}

/// Translation service configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct TranslateConfig {
    /// Endpoint accepting `{q, source, target, format}` and returning `{translatedText}`
    pub api_url: String,
    pub api_key: Option<SecretString>,
}

impl std::fmt::Debug for TranslateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslateConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("SITE_DATABASE_URL")?;
        let host = parse_env::<IpAddr>("SITE_HOST", "127.0.0.1")?;
        let port = parse_env::<u16>("SITE_PORT", "3000")?;
        let base_url = get_env_or_default("SITE_BASE_URL", "http://localhost:3000");
        url::Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("SITE_BASE_URL".to_string(), e.to_string()))?;

        let content = ContentConfig::from_env()?;
        let admin = AdminBootstrapConfig {
            username: get_env_or_default("ADMIN_INITIAL_USERNAME", "admin"),
            password: get_optional_env("ADMIN_INITIAL_PASSWORD").map(SecretString::from),
        };
        let email = EmailConfig::from_env()?;
        let translate = TranslateConfig::from_env();

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);
        let log_format = match get_optional_env("LOG_FORMAT").as_deref() {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            content,
            admin,
            email,
            translate,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
            log_format,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ContentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let ttl_secs = parse_env::<u64>("CATEGORIES_CACHE_TTL_SECS", "300")?;
        let excluded = parse_env::<i32>("EXCLUDED_CATEGORY_ID", "29")?;
        let featured = get_env_or_default("FEATURED_PRODUCT_IDS", DEFAULT_FEATURED_PRODUCT_IDS);
        let featured_product_ids = parse_id_list(&featured)
            .map_err(|e| ConfigError::InvalidEnvVar("FEATURED_PRODUCT_IDS".to_string(), e))?;
        let max_upload_bytes = match get_optional_env("MAX_UPLOAD_BYTES") {
            Some(raw) => raw.parse::<usize>().map_err(|e| {
                ConfigError::InvalidEnvVar("MAX_UPLOAD_BYTES".to_string(), e.to_string())
            })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            categories_cache_ttl: Duration::from_secs(ttl_secs),
            excluded_category_id: CategoryId::new(excluded),
            featured_product_ids,
            max_upload_bytes,
        })
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            categories_cache_ttl: Duration::from_secs(300),
            excluded_category_id: CategoryId::new(29),
            featured_product_ids: parse_id_list(DEFAULT_FEATURED_PRODUCT_IDS).unwrap_or_default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl EmailConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(smtp_host) = get_optional_env("SMTP_HOST") else {
            return Ok(None);
        };
        let smtp_port = parse_env::<u16>("SMTP_PORT", "465")?;
        let implicit_tls = parse_env::<bool>("SMTP_IMPLICIT_TLS", "true")?;
        let smtp_username = get_optional_env("SMTP_USERNAME");
        let from_address = get_optional_env("MAIL_FROM")
            .or_else(|| smtp_username.clone())
            .ok_or_else(|| ConfigError::MissingEnvVar("MAIL_FROM".to_string()))?;

        Ok(Some(Self {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password: get_optional_env("SMTP_PASSWORD").map(SecretString::from),
            implicit_tls,
            from_address,
            contact_recipient: get_env_or_default("CONTACT_RECIPIENT", "info@noblepaints.com.sa"),
        }))
    }
}

impl TranslateConfig {
    fn from_env() -> Option<Self> {
        let api_url = get_optional_env("TRANSLATE_API_URL")?;
        Some(Self {
            api_url,
            api_key: get_optional_env("TRANSLATE_API_KEY").map(SecretString::from),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a comma-separated list of product ids, ignoring blank entries.
fn parse_id_list(raw: &str) -> Result<Vec<ProductId>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<ProductId>().map_err(|e| format!("{s:?}: {e}")))
        .collect()
}

/// Parse an environment variable, using `default` when it is unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list_keeps_order() {
        let ids = parse_id_list("68, 71,,78 ").unwrap();
        assert_eq!(
            ids,
            vec![ProductId::new(68), ProductId::new(71), ProductId::new(78)]
        );
        assert!(parse_id_list("68,abc").is_err());
        assert!(parse_id_list("").unwrap().is_empty());
    }

    #[test]
    fn test_default_content_config() {
        let content = ContentConfig::default();
        assert_eq!(content.featured_product_ids.len(), 10);
        assert_eq!(content.featured_product_ids[0], ProductId::new(68));
        assert_eq!(content.excluded_category_id, CategoryId::new(29));
        assert_eq!(content.categories_cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_email_config_debug_redacts_password() {
        let config = EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 465,
            smtp_username: Some("mailer".to_string()),
            smtp_password: Some(SecretString::from("hunter2-super-secret")),
            implicit_tls: true,
            from_address: "site@example.com".to_string(),
            contact_recipient: "info@example.com".to_string(),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("smtp.example.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2-super-secret"));
    }

    #[test]
    fn test_admin_bootstrap_debug_redacts_password() {
        let config = AdminBootstrapConfig {
            username: "admin".to_string(),
            password: Some(SecretString::from("bootstrap-pass")),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("admin"));
        assert!(!debug_output.contains("bootstrap-pass"));
    }
}
