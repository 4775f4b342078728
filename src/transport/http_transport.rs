//! HTTP transport implementation using reqwest.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::time::Duration;

use super::HttpResponse;
use crate::config::DataForSeoConfig;
use crate::errors::{DataForSeoError, DataForSeoResult};

/// HTTP transport trait for the DataForSEO client.
///
/// Implementations perform exactly one network attempt and map any non-2xx
/// status to [`DataForSeoError::Upstream`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a JSON `POST` request.
    async fn post(
        &self,
        url: &str,
        headers: HashMap<String, String>,
        body: Bytes,
    ) -> DataForSeoResult<HttpResponse>;
}

/// Configuration for `ReqwestTransport`.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl From<&DataForSeoConfig> for TransportConfig {
    fn from(config: &DataForSeoConfig) -> Self {
        Self {
            timeout: config.timeout,
            connect_timeout: config.connect_timeout,
        }
    }
}

/// Reqwest-based HTTP transport implementation.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a new transport with configuration.
    pub fn with_config(config: TransportConfig) -> DataForSeoResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| {
                DataForSeoError::configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client })
    }

    /// Creates a new transport with a custom client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Maps a non-2xx response to an upstream error.
    fn map_http_error(status: u16, body: &Bytes) -> DataForSeoError {
        // DataForSEO error bodies usually carry the same envelope as successes
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("status_message")
                    .and_then(|m| m.as_str())
                    .map(ToString::to_string)
            })
            .unwrap_or_else(|| {
                reqwest::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Unknown status")
                    .to_string()
            });

        DataForSeoError::Upstream { status, message }
    }

    fn extract_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|v| (k.as_str().to_string(), v.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(
        &self,
        url: &str,
        headers: HashMap<String, String>,
        body: Bytes,
    ) -> DataForSeoResult<HttpResponse> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request.body(body).send().await?;

        let status = response.status().as_u16();
        let headers = Self::extract_headers(response.headers());
        let body = response.bytes().await?;

        if !(200..300).contains(&status) {
            return Err(Self::map_http_error(status, &body));
        }

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_http_error_uses_envelope_message() {
        let body = Bytes::from_static(br#"{"status_code":40100,"status_message":"You are not authorized"}"#);
        match ReqwestTransport::map_http_error(401, &body) {
            DataForSeoError::Upstream { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "You are not authorized");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_map_http_error_falls_back_to_reason() {
        let body = Bytes::from_static(b"<html>bad gateway</html>");
        match ReqwestTransport::map_http_error(502, &body) {
            DataForSeoError::Upstream { message, .. } => assert_eq!(message, "Bad Gateway"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
