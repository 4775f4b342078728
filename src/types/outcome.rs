//! Typed result of an orchestrated request.

use serde::Serialize;
use std::time::Duration;

use crate::errors::DataForSeoError;

/// Result of a pipeline call. Remote failures are reported here, never as `Err`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOutcome<T> {
    /// Whether the call produced data.
    pub success: bool,
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable error message on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// HTTP-style status describing a failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// True when the payload came from the cache.
    pub cache_hit: bool,
    /// Wall time spent in the pipeline.
    pub processing_time_ms: u64,
    /// Typed failure for callers that need to branch on it.
    #[serde(skip)]
    pub failure: Option<DataForSeoError>,
}

impl<T> RequestOutcome<T> {
    /// Creates a successful outcome from a remote call.
    pub fn success(data: T, elapsed: Duration) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            status_code: None,
            cache_hit: false,
            processing_time_ms: millis(elapsed),
            failure: None,
        }
    }

    /// Creates a successful outcome served from the cache.
    pub fn cached(data: T, elapsed: Duration) -> Self {
        Self {
            cache_hit: true,
            ..Self::success(data, elapsed)
        }
    }

    /// Creates a failed outcome.
    pub fn failure(error: DataForSeoError, elapsed: Duration) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            status_code: Some(error.status_code()),
            cache_hit: false,
            processing_time_ms: millis(elapsed),
            failure: Some(error),
        }
    }

    /// Maps the payload, keeping the rest of the outcome.
    pub fn map<U, F>(self, f: F) -> RequestOutcome<U>
    where
        F: FnOnce(T) -> U,
    {
        RequestOutcome {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
            status_code: self.status_code,
            cache_hit: self.cache_hit,
            processing_time_ms: self.processing_time_ms,
            failure: self.failure,
        }
    }

    /// Maps the payload with a fallible conversion. A conversion error turns
    /// the outcome into a failure.
    pub fn and_then<U, F>(self, f: F) -> RequestOutcome<U>
    where
        F: FnOnce(T) -> Result<U, DataForSeoError>,
    {
        let Self {
            data,
            error,
            status_code,
            cache_hit,
            processing_time_ms,
            failure,
            ..
        } = self;

        match data.map(f) {
            Some(Ok(value)) => RequestOutcome {
                success: true,
                data: Some(value),
                error: None,
                status_code: None,
                cache_hit,
                processing_time_ms,
                failure: None,
            },
            Some(Err(err)) => RequestOutcome {
                error: Some(err.to_string()),
                status_code: Some(err.status_code()),
                failure: Some(err),
                cache_hit,
                ..RequestOutcome::empty_failure(processing_time_ms)
            },
            None => RequestOutcome {
                error,
                status_code,
                failure,
                ..RequestOutcome::empty_failure(processing_time_ms)
            },
        }
    }

    /// Replaces the error message of a failed outcome.
    #[must_use]
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        if !self.success {
            self.error = Some(message.into());
        }
        self
    }

    /// Returns true for successful outcomes.
    pub fn is_success(&self) -> bool {
        self.success
    }

    fn empty_failure(processing_time_ms: u64) -> Self {
        Self {
            success: false,
            data: None,
            error: None,
            status_code: None,
            cache_hit: false,
            processing_time_ms,
            failure: None,
        }
    }
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_serialization() {
        let outcome = RequestOutcome::success(json!({"a": 1}), Duration::from_millis(12));
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            json!({"success": true, "data": {"a": 1}, "cacheHit": false, "processingTimeMs": 12})
        );
    }

    #[test]
    fn test_failure_keeps_typed_error() {
        let outcome: RequestOutcome<()> =
            RequestOutcome::failure(DataForSeoError::CircuitOpen, Duration::ZERO);
        assert!(!outcome.success);
        assert_eq!(outcome.status_code, Some(503));
        assert!(matches!(outcome.failure, Some(DataForSeoError::CircuitOpen)));
    }

    #[test]
    fn test_and_then_converts_errors() {
        let outcome = RequestOutcome::cached(3, Duration::ZERO)
            .and_then(|_| Err::<u8, _>(DataForSeoError::validation("bad shape")));
        assert!(!outcome.success);
        assert!(outcome.data.is_none());
        assert_eq!(outcome.status_code, Some(400));
    }

    #[test]
    fn test_with_error_message_only_touches_failures() {
        let ok = RequestOutcome::success(1, Duration::ZERO).with_error_message("nope");
        assert!(ok.error.is_none());

        let failed: RequestOutcome<u8> =
            RequestOutcome::failure(DataForSeoError::CircuitOpen, Duration::ZERO)
                .with_error_message("Error analizando keywords");
        assert_eq!(failed.error.as_deref(), Some("Error analizando keywords"));
    }
}
