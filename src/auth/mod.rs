//! Authentication module for the DataForSEO client.
//!
//! DataForSEO uses HTTP Basic authentication with the account login and API
//! password. Each request also carries a fresh `X-Request-ID`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

use crate::config::DataForSeoConfig;

/// Trait for authentication managers.
pub trait AuthManager: Send + Sync {
    /// Returns the headers to attach to an outgoing request.
    fn get_headers(&self) -> HashMap<String, String>;
}

/// Basic authentication manager.
pub struct BasicAuthManager {
    login: String,
    password: SecretString,
    user_agent: String,
}

impl BasicAuthManager {
    /// Creates a new basic auth manager from config.
    pub fn new(config: &DataForSeoConfig) -> Self {
        Self {
            login: config.login().to_string(),
            password: SecretString::new(config.password().to_string()),
            user_agent: config.user_agent.clone(),
        }
    }

    /// Returns the `Authorization` header value.
    pub fn authorization(&self) -> String {
        let credentials = format!("{}:{}", self.login, self.password.expose_secret());
        format!("Basic {}", STANDARD.encode(credentials.as_bytes()))
    }
}

impl AuthManager for BasicAuthManager {
    fn get_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();

        headers.insert("Authorization".to_string(), self.authorization());
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("User-Agent".to_string(), self.user_agent.clone());
        headers.insert(
            "X-Request-ID".to_string(),
            format!("dfs-{}", uuid::Uuid::new_v4()),
        );

        headers
    }
}

impl std::fmt::Debug for BasicAuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthManager")
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> BasicAuthManager {
        let config = DataForSeoConfig::builder()
            .login("analyst@example.com")
            .password("a-very-long-password")
            .build();
        BasicAuthManager::new(&config)
    }

    #[test]
    fn test_basic_authorization_header() {
        let headers = manager().get_headers();
        let expected = format!(
            "Basic {}",
            STANDARD.encode("analyst@example.com:a-very-long-password")
        );
        assert_eq!(headers.get("Authorization"), Some(&expected));
        assert_eq!(
            headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_request_ids_are_unique() {
        let auth = manager();
        let first = auth.get_headers().remove("X-Request-ID");
        let second = auth.get_headers().remove("X-Request-ID");
        assert!(first.is_some());
        assert_ne!(first, second);
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug_str = format!("{:?}", manager());
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("a-very-long-password"));
    }
}
