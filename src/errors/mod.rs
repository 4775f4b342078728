//! Error types for the DataForSEO client.
//!
//! Every failure mode of the request pipeline maps to one variant of
//! [`DataForSeoError`]. The client converts these into failed
//! [`RequestOutcome`](crate::RequestOutcome) values at its boundary, so callers
//! of the semantic operations only see them through `outcome.failure`.

use thiserror::Error;

/// Result type alias for DataForSEO operations.
pub type DataForSeoResult<T> = Result<T, DataForSeoError>;

/// Status code DataForSEO reports for a successful task or envelope.
pub const API_STATUS_OK: u32 = 20000;

/// Error type for DataForSEO client operations.
#[derive(Debug, Clone, Error)]
pub enum DataForSeoError {
    /// Missing or invalid credentials, base URL, or endpoint parameters.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// The circuit breaker judged the upstream unhealthy and failed fast.
    #[error("Circuit breaker open: service temporarily unavailable")]
    CircuitOpen,

    /// The upstream answered with a non-2xx HTTP status.
    #[error("Upstream error (HTTP {status}): {message}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// The upstream answered 2xx but the envelope carried an error status.
    #[error("API error {code}: {message}")]
    Api {
        /// DataForSEO status code.
        code: u32,
        /// Status message from the envelope.
        message: String,
    },

    /// Request timeout.
    #[error("Request timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// Connection-level failure.
    #[error("Network error: {message}")]
    Network {
        /// Error message.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Deserialization error: {message}")]
    Deserialization {
        /// Error message.
        message: String,
    },

    /// Caller input was rejected before any remote call.
    #[error("Validation error: {message}")]
    Validation {
        /// Error message.
        message: String,
    },

    /// The text-generation collaborator failed.
    #[error("Text generation failed: {message}")]
    Generation {
        /// Error message.
        message: String,
    },
}

impl DataForSeoError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        DataForSeoError::Configuration {
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        DataForSeoError::Validation {
            message: message.into(),
        }
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            DataForSeoError::Upstream { .. }
            | DataForSeoError::Timeout { .. }
            | DataForSeoError::Network { .. } => true,
            DataForSeoError::Api { code, .. } => *code >= 50000,
            _ => false,
        }
    }

    /// Returns an HTTP-style status code describing the failure.
    pub fn status_code(&self) -> u16 {
        match self {
            DataForSeoError::Upstream { status, .. } => *status,
            DataForSeoError::CircuitOpen => 503,
            DataForSeoError::Timeout { .. } => 504,
            DataForSeoError::Network { .. } | DataForSeoError::Api { .. } => 502,
            DataForSeoError::Validation { .. } => 400,
            DataForSeoError::Configuration { .. }
            | DataForSeoError::Deserialization { .. }
            | DataForSeoError::Generation { .. } => 500,
        }
    }

    /// Returns a short, stable label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DataForSeoError::Configuration { .. } => "configuration",
            DataForSeoError::CircuitOpen => "circuit_open",
            DataForSeoError::Upstream { .. } => "upstream_http",
            DataForSeoError::Api { .. } => "api",
            DataForSeoError::Timeout { .. } => "timeout",
            DataForSeoError::Network { .. } => "network",
            DataForSeoError::Deserialization { .. } => "deserialization",
            DataForSeoError::Validation { .. } => "validation",
            DataForSeoError::Generation { .. } => "generation",
        }
    }
}

impl From<reqwest::Error> for DataForSeoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DataForSeoError::Timeout {
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            DataForSeoError::Upstream {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            DataForSeoError::Network {
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for DataForSeoError {
    fn from(err: serde_json::Error) -> Self {
        DataForSeoError::Deserialization {
            message: err.to_string(),
        }
    }
}
