//! On-page service.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::send;
use crate::client::DataForSeoClient;
use crate::types::{Endpoint, OnPageRequest, RequestOutcome};

/// On-page service trait.
#[async_trait]
pub trait OnPageService: Send + Sync {
    /// Parses the content of a single page.
    async fn content_parsing(&self, request: OnPageRequest) -> RequestOutcome<Value>;
}

/// Default implementation of the on-page service.
pub struct DefaultOnPageService<'a> {
    client: &'a DataForSeoClient,
}

impl<'a> DefaultOnPageService<'a> {
    /// Creates a new on-page service.
    pub fn new(client: &'a DataForSeoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OnPageService for DefaultOnPageService<'_> {
    async fn content_parsing(&self, request: OnPageRequest) -> RequestOutcome<Value> {
        let body = json!({
            "url": request.url,
            "enable_javascript": request.enable_javascript.unwrap_or(false),
            "custom_js": request.custom_js,
            "custom_user_agent": request.custom_user_agent,
            "accept_language": request.accept_language,
        });

        send(self.client, Endpoint::ContentParsing.into(), body).await
    }
}
