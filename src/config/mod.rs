//! Configuration module for the DataForSEO client.
//!
//! Provides credentials, base URL and transport timeouts. Unlike a typical
//! builder, building never fails: an invalid configuration is still a value,
//! and the client answers every call with a configuration-error outcome until
//! it is fixed. Use [`DataForSeoConfig::validate`] to check it up front.

use once_cell::sync::Lazy;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::errors::{DataForSeoError, DataForSeoResult};

/// Default base URL for the DataForSEO API.
pub const DEFAULT_BASE_URL: &str = "https://api.dataforseo.com";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 16;

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("integrations-dataforseo/", env!("CARGO_PKG_VERSION"));

#[allow(clippy::expect_used)]
static LOGIN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("login pattern is valid"));

/// Configuration for the DataForSEO client.
#[derive(Clone)]
pub struct DataForSeoConfig {
    /// Account login (an email address).
    pub(crate) login: String,
    /// API password (stored securely).
    pub(crate) password: SecretString,
    /// Base URL for API requests.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl DataForSeoConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> DataForSeoConfigBuilder {
        DataForSeoConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DATAFORSEO_LOGIN` (required): account login
    /// - `DATAFORSEO_PASSWORD` (required): API password
    /// - `DATAFORSEO_BASE_URL` (optional): Custom base URL
    /// - `DATAFORSEO_TIMEOUT` (optional): Request timeout in seconds
    ///
    /// Missing credentials are not reported here; they surface through
    /// [`validate`](Self::validate) and the client's outcomes.
    pub fn from_env() -> Self {
        let mut builder = DataForSeoConfigBuilder::new();

        if let Ok(login) = std::env::var("DATAFORSEO_LOGIN") {
            builder = builder.login(login);
        }

        if let Ok(password) = std::env::var("DATAFORSEO_PASSWORD") {
            builder = builder.password(password);
        }

        if let Ok(base_url) = std::env::var("DATAFORSEO_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        if let Ok(timeout_str) = std::env::var("DATAFORSEO_TIMEOUT") {
            if let Ok(timeout_secs) = timeout_str.parse::<u64>() {
                builder = builder.timeout(Duration::from_secs(timeout_secs));
            }
        }

        builder.build()
    }

    /// Returns the account login.
    pub fn login(&self) -> &str {
        &self.login
    }

    /// Returns the password (exposing the secret).
    pub(crate) fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Checks credentials and base URL.
    pub fn validate(&self) -> DataForSeoResult<()> {
        if self.login.is_empty() {
            return Err(DataForSeoError::configuration("DataForSEO login is required"));
        }
        if !LOGIN_PATTERN.is_match(&self.login) {
            return Err(DataForSeoError::configuration(
                "DataForSEO login must be a valid email address",
            ));
        }

        let password = self.password();
        if password.is_empty() {
            return Err(DataForSeoError::configuration(
                "DataForSEO password is required",
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DataForSeoError::configuration(format!(
                "DataForSEO password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let url = url::Url::parse(&self.base_url).map_err(|e| {
            DataForSeoError::configuration(format!("Invalid base URL '{}': {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DataForSeoError::configuration(
                "Base URL must start with http:// or https://",
            ));
        }

        Ok(())
    }

    /// Returns the full URL for an endpoint path.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl std::fmt::Debug for DataForSeoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataForSeoConfig")
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Builder for `DataForSeoConfig`.
#[derive(Default)]
pub struct DataForSeoConfigBuilder {
    login: Option<String>,
    password: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl DataForSeoConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the account login.
    pub fn login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }

    /// Sets the API password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Overrides the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> DataForSeoConfig {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        DataForSeoConfig {
            login: self.login.unwrap_or_default().trim().to_string(),
            password: SecretString::new(self.password.unwrap_or_default()),
            base_url,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_builder() -> DataForSeoConfigBuilder {
        DataForSeoConfig::builder()
            .login("analyst@example.com")
            .password("a-very-long-password")
    }

    #[test]
    fn test_config_builder_success() {
        let config = valid_builder()
            .base_url("https://sandbox.dataforseo.com/")
            .timeout(Duration::from_secs(5))
            .build();

        assert!(config.validate().is_ok());
        assert_eq!(config.login(), "analyst@example.com");
        assert_eq!(config.password(), "a-very-long-password");
        assert_eq!(config.base_url, "https://sandbox.dataforseo.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_config_builder_defaults() {
        let config = valid_builder().build();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_missing_credentials_fail_validation() {
        let config = DataForSeoConfig::builder().build();
        assert!(matches!(
            config.validate(),
            Err(DataForSeoError::Configuration { .. })
        ));
    }

    #[test]
    fn test_login_must_look_like_email() {
        let config = DataForSeoConfig::builder()
            .login("not-an-email")
            .password("a-very-long-password")
            .build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_short_password_fails_validation() {
        let config = DataForSeoConfig::builder()
            .login("analyst@example.com")
            .password("short")
            .build();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("at least 16"));
    }

    #[test]
    fn test_invalid_base_url_fails_validation() {
        let config = valid_builder().base_url("ftp://api.dataforseo.com").build();
        assert!(config.validate().is_err());

        let config = valid_builder().base_url("not a url").build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_url() {
        let config = valid_builder().build();
        assert_eq!(
            config.endpoint_url("/v3/serp/google/organic/live/advanced.ai"),
            "https://api.dataforseo.com/v3/serp/google/organic/live/advanced.ai"
        );

        let mut config = valid_builder().build();
        config.base_url = "https://sandbox.dataforseo.com/".to_string();
        assert_eq!(
            config.endpoint_url("/v3/keywords_data/google_ads/search_volume/live.ai"),
            "https://sandbox.dataforseo.com/v3/keywords_data/google_ads/search_volume/live.ai"
        );
    }

    #[test]
    fn test_config_debug_redacts_password() {
        let config = valid_builder().build();

        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("a-very-long-password"));
    }
}
