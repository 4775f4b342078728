//! HTTP transport module for the DataForSEO client.
//!
//! Every DataForSEO endpoint the client uses is a JSON `POST`, so the
//! transport exposes exactly that.

mod http_transport;

pub use http_transport::{HttpTransport, ReqwestTransport, TransportConfig};

use bytes::Bytes;
use std::collections::HashMap;

/// HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
