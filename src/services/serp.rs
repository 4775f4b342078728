//! SERP service.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::send;
use crate::client::DataForSeoClient;
use crate::types::{Endpoint, EndpointDescriptor, RequestOutcome, SerpRequest};

/// SERP service trait.
#[async_trait]
pub trait SerpService: Send + Sync {
    /// Live organic results with advanced fields.
    async fn organic_live_advanced(&self, request: SerpRequest) -> RequestOutcome<Value>;
}

/// Default implementation of the SERP service.
pub struct DefaultSerpService<'a> {
    client: &'a DataForSeoClient,
}

impl<'a> DefaultSerpService<'a> {
    /// Creates a new SERP service.
    pub fn new(client: &'a DataForSeoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SerpService for DefaultSerpService<'_> {
    async fn organic_live_advanced(&self, request: SerpRequest) -> RequestOutcome<Value> {
        let engine = request.search_engine.as_str();
        let descriptor = EndpointDescriptor::new(Endpoint::SerpOrganicLiveAdvanced)
            .with_param("search_engine", engine);

        let body = json!({
            "keyword": request.keyword,
            "location_name": request.location_name,
            "language_code": request.language_code,
            "depth": request.depth,
            "device": request.device.as_str(),
            "max_crawl_pages": request.max_crawl_pages,
            "people_also_ask_click_depth": request.people_also_ask_click_depth,
        });

        send(self.client, descriptor, body).await
    }
}
