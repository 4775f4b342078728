//! Scripted [`HttpTransport`] that records what the client sends.

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::errors::{DataForSeoError, DataForSeoResult};
use crate::transport::{HttpResponse, HttpTransport};

/// One POST as the client sent it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Resolved endpoint URL.
    pub url: String,
    /// Auth and content headers.
    pub headers: HashMap<String, String>,
    /// Serialized task array.
    pub body: Bytes,
}

impl RecordedRequest {
    /// Parses the body as JSON, `Null` when it is not JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// What the mock answers with.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// A 2xx response with this body.
    Body {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: Bytes,
    },
    /// A transport-level failure.
    Error(DataForSeoError),
}

impl MockResponse {
    /// HTTP 200 with `body` serialized as JSON.
    pub fn json(body: impl serde::Serialize) -> Self {
        Self::Body {
            status: 200,
            body: Bytes::from(serde_json::to_vec(&body).unwrap_or_default()),
        }
    }

    /// Non-2xx answer, as the real transport reports it.
    pub fn error(status: u16, message: &str) -> Self {
        Self::Error(DataForSeoError::Upstream {
            status,
            message: message.to_string(),
        })
    }

    /// Connection-level failure.
    pub fn network(message: &str) -> Self {
        Self::Error(DataForSeoError::Network {
            message: message.to_string(),
        })
    }

    /// Creates a DataForSEO envelope with one task holding `result`.
    pub fn task_result(result: serde_json::Value) -> Self {
        Self::json(serde_json::json!({
            "status_code": 20000,
            "status_message": "Ok.",
            "tasks": [{
                "status_code": 20000,
                "status_message": "Ok.",
                "result": result,
            }],
        }))
    }
}

/// Answers from a queue, then from the fallback, then with a 500.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
    default_response: Option<MockResponse>,
    latency: Option<Duration>,
}

impl MockTransport {
    /// Empty queue, no fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the answer to a future request.
    pub fn enqueue_response(&self, response: MockResponse) {
        self.responses.lock().push_back(response);
    }

    /// Answer used whenever the queue is empty.
    #[must_use]
    pub fn with_default_response(mut self, response: MockResponse) -> Self {
        self.default_response = Some(response);
        self
    }

    /// Sleeps this long before answering each request.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Every request so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Most recent request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().last().cloned()
    }

    /// Requests received.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn next_response(&self) -> MockResponse {
        self.responses
            .lock()
            .pop_front()
            .or_else(|| self.default_response.clone())
            .unwrap_or_else(|| MockResponse::error(500, "No mock response configured"))
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post(
        &self,
        url: &str,
        headers: HashMap<String, String>,
        body: Bytes,
    ) -> DataForSeoResult<HttpResponse> {
        self.requests.lock().push(RecordedRequest {
            url: url.to_string(),
            headers,
            body,
        });

        let response = self.next_response();

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match response {
            MockResponse::Body { status, body } => Ok(HttpResponse {
                status,
                headers: HashMap::from([(
                    "content-type".to_string(),
                    "application/json".to_string(),
                )]),
                body,
            }),
            MockResponse::Error(error) => Err(error),
        }
    }
}
