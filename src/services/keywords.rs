//! Keywords data service: search volume and trends.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::send;
use crate::client::DataForSeoClient;
use crate::types::{Endpoint, KeywordsRequest, RequestOutcome, TrendsRequest};

/// Trend source used when none is given.
pub const DEFAULT_TREND_TYPE: &str = "web";

/// Time range used when neither dates nor a range are given.
pub const DEFAULT_TIME_RANGE: &str = "past_7_days";

/// Keywords data service trait.
#[async_trait]
pub trait KeywordsService: Send + Sync {
    /// Google Ads search volume for a keyword list.
    async fn search_volume(&self, request: KeywordsRequest) -> RequestOutcome<Value>;

    /// Relative interest over time for up to five keywords.
    async fn trends_explore(&self, request: TrendsRequest) -> RequestOutcome<Value>;
}

/// Default implementation of the keywords data service.
pub struct DefaultKeywordsService<'a> {
    client: &'a DataForSeoClient,
}

impl<'a> DefaultKeywordsService<'a> {
    /// Creates a new keywords data service.
    pub fn new(client: &'a DataForSeoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl KeywordsService for DefaultKeywordsService<'_> {
    async fn search_volume(&self, request: KeywordsRequest) -> RequestOutcome<Value> {
        let body = json!({
            "keywords": request.keywords,
            "location_name": request.location_name,
            "language_code": request.language_code,
        });

        send(self.client, Endpoint::SearchVolume.into(), body).await
    }

    async fn trends_explore(&self, request: TrendsRequest) -> RequestOutcome<Value> {
        let trend_type = request.trend_type.as_deref().unwrap_or(DEFAULT_TREND_TYPE);
        let time_range = match (&request.time_range, &request.date_from) {
            (Some(range), _) => Some(range.as_str()),
            (None, Some(_)) => None,
            (None, None) => Some(DEFAULT_TIME_RANGE),
        };
        let body = json!({
            "keywords": request.keywords,
            "type": trend_type,
            "location_name": request.location_name,
            "date_from": request.date_from,
            "date_to": request.date_to,
            "time_range": time_range,
        });

        send(self.client, Endpoint::TrendsExplore.into(), body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockResponse, MockTransport};
    use crate::DataForSeoConfig;
    use std::sync::Arc;

    fn client(transport: Arc<MockTransport>) -> DataForSeoClient {
        DataForSeoClient::builder()
            .config(
                DataForSeoConfig::builder()
                    .login("user@example.com")
                    .password("0123456789abcdef")
                    .build(),
            )
            .transport(transport)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_search_volume_cache_key_ignores_case() {
        let transport = Arc::new(
            MockTransport::new().with_default_response(MockResponse::task_result(json!([]))),
        );
        let client = client(transport.clone());

        let first = client.keywords().search_volume(KeywordsRequest::new(["SEO"])).await;
        let second = client.keywords().search_volume(KeywordsRequest::new([" seo"])).await;

        assert!(!first.cache_hit);
        assert!(second.cache_hit);
        assert_eq!(transport.request_count(), 1);
        assert_eq!(
            transport.last_request().unwrap().json(),
            json!([{"keywords": ["SEO"], "location_name": "United States", "language_code": "en"}])
        );
    }

    #[tokio::test]
    async fn test_trends_defaults() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue_response(MockResponse::task_result(json!([])));
        let client = client(transport.clone());

        let outcome = client.keywords().trends_explore(TrendsRequest::new(["rust"])).await;
        assert!(outcome.success);

        let body = transport.last_request().unwrap().json();
        assert_eq!(body[0]["type"], "web");
        assert_eq!(body[0]["time_range"], "past_7_days");
        assert!(body[0].get("date_from").is_none());
    }
}
