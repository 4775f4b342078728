//! DataForSEO Labs service: keyword research and domain analytics.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{send, DEFAULT_LIMIT};
use crate::client::DataForSeoClient;
use crate::types::{DomainRequest, Endpoint, KeywordsRequest, RequestOutcome};

/// Labs service trait.
#[async_trait]
pub trait LabsService: Send + Sync {
    /// Keywords a domain ranks for.
    async fn ranked_keywords(&self, request: DomainRequest) -> RequestOutcome<Value>;

    /// Keyword ideas related to the seed keywords.
    async fn keyword_ideas(&self, request: KeywordsRequest) -> RequestOutcome<Value>;

    /// Search volume, difficulty and intent for each keyword.
    async fn keyword_overview(&self, request: KeywordsRequest) -> RequestOutcome<Value>;

    /// Keywords relevant to a domain.
    async fn keywords_for_site(&self, request: DomainRequest) -> RequestOutcome<Value>;

    /// Difficulty scores for up to a thousand keywords.
    async fn bulk_keyword_difficulty(&self, request: KeywordsRequest) -> RequestOutcome<Value>;

    /// Domains competing with the target in organic search.
    async fn competitors_domain(&self, request: DomainRequest) -> RequestOutcome<Value>;

    /// Ranking and traffic summary for a domain.
    async fn domain_rank_overview(&self, request: DomainRequest) -> RequestOutcome<Value>;

    /// Subdomains of the target with their ranking data.
    async fn subdomains(&self, request: DomainRequest) -> RequestOutcome<Value>;

    /// Keywords both domains rank for.
    async fn domain_intersection(
        &self,
        target1: &str,
        target2: &str,
        request: DomainRequest,
    ) -> RequestOutcome<Value>;

    /// Monthly ranking history of a domain.
    async fn historical_rank_overview(&self, request: DomainRequest) -> RequestOutcome<Value>;

    /// Keywords shared by the given pages.
    async fn page_intersection(&self, pages: &[String], request: DomainRequest)
        -> RequestOutcome<Value>;

    /// Estimated traffic for many targets at once.
    async fn bulk_traffic_estimation(
        &self,
        targets: &[String],
        request: DomainRequest,
    ) -> RequestOutcome<Value>;

    /// Historical SERP snapshots for a keyword.
    async fn historical_serp(&self, keyword: &str, request: DomainRequest) -> RequestOutcome<Value>;
}

/// Default implementation of the Labs service.
pub struct DefaultLabsService<'a> {
    client: &'a DataForSeoClient,
}

impl<'a> DefaultLabsService<'a> {
    /// Creates a new Labs service.
    pub fn new(client: &'a DataForSeoClient) -> Self {
        Self { client }
    }

    async fn domain_call(
        &self,
        endpoint: Endpoint,
        request: &DomainRequest,
        listing: bool,
    ) -> RequestOutcome<Value> {
        let mut body = json!({
            "target": request.target,
            "location_name": request.location_name,
            "language_code": request.language_code,
            "ignore_synonyms": request.ignore_synonyms.unwrap_or(true),
            "include_subdomains": request.include_subdomains,
        });
        if listing {
            extend(&mut body, listing_fields(request.limit, request.offset, &request.filters, &request.order_by));
        }

        send(self.client, endpoint.into(), body).await
    }

    async fn keywords_call(
        &self,
        endpoint: Endpoint,
        request: &KeywordsRequest,
        listing: bool,
    ) -> RequestOutcome<Value> {
        let mut body = json!({
            "keywords": request.keywords,
            "location_name": request.location_name,
            "language_code": request.language_code,
            "include_clickstream_data": request.include_clickstream_data,
        });
        if listing {
            extend(&mut body, listing_fields(request.limit, request.offset, &request.filters, &request.order_by));
        }

        send(self.client, endpoint.into(), body).await
    }
}

fn listing_fields(
    limit: Option<u32>,
    offset: Option<u32>,
    filters: &Option<Value>,
    order_by: &Option<Vec<String>>,
) -> Value {
    json!({
        "limit": limit.unwrap_or(DEFAULT_LIMIT),
        "offset": offset.unwrap_or(0),
        "filters": filters,
        "order_by": order_by,
    })
}

fn extend(body: &mut Value, extra: Value) {
    if let (Value::Object(body), Value::Object(extra)) = (body, extra) {
        body.extend(extra);
    }
}

#[async_trait]
impl LabsService for DefaultLabsService<'_> {
    async fn ranked_keywords(&self, request: DomainRequest) -> RequestOutcome<Value> {
        self.domain_call(Endpoint::RankedKeywords, &request, true).await
    }

    async fn keyword_ideas(&self, request: KeywordsRequest) -> RequestOutcome<Value> {
        self.keywords_call(Endpoint::KeywordIdeas, &request, true).await
    }

    async fn keyword_overview(&self, request: KeywordsRequest) -> RequestOutcome<Value> {
        self.keywords_call(Endpoint::KeywordOverview, &request, false).await
    }

    async fn keywords_for_site(&self, request: DomainRequest) -> RequestOutcome<Value> {
        self.domain_call(Endpoint::KeywordsForSite, &request, true).await
    }

    async fn bulk_keyword_difficulty(&self, request: KeywordsRequest) -> RequestOutcome<Value> {
        self.keywords_call(Endpoint::BulkKeywordDifficulty, &request, false).await
    }

    async fn competitors_domain(&self, request: DomainRequest) -> RequestOutcome<Value> {
        self.domain_call(Endpoint::CompetitorsDomain, &request, true).await
    }

    async fn domain_rank_overview(&self, request: DomainRequest) -> RequestOutcome<Value> {
        self.domain_call(Endpoint::DomainRankOverview, &request, false).await
    }

    async fn subdomains(&self, request: DomainRequest) -> RequestOutcome<Value> {
        self.domain_call(Endpoint::Subdomains, &request, true).await
    }

    async fn domain_intersection(
        &self,
        target1: &str,
        target2: &str,
        request: DomainRequest,
    ) -> RequestOutcome<Value> {
        let endpoint = Endpoint::DomainIntersection;
        let mut body = json!({
            "target1": target1,
            "target2": target2,
            "location_name": request.location_name,
            "language_code": request.language_code,
            "ignore_synonyms": request.ignore_synonyms.unwrap_or(true),
        });
        extend(&mut body, listing_fields(request.limit, request.offset, &request.filters, &request.order_by));

        send(self.client, endpoint.into(), body).await
    }

    async fn historical_rank_overview(&self, request: DomainRequest) -> RequestOutcome<Value> {
        self.domain_call(Endpoint::HistoricalRankOverview, &request, false).await
    }

    async fn page_intersection(
        &self,
        pages: &[String],
        request: DomainRequest,
    ) -> RequestOutcome<Value> {
        let endpoint = Endpoint::PageIntersection;
        let mut body = json!({
            "pages": pages,
            "location_name": request.location_name,
            "language_code": request.language_code,
            "ignore_synonyms": request.ignore_synonyms.unwrap_or(true),
        });
        extend(&mut body, listing_fields(request.limit, request.offset, &request.filters, &request.order_by));

        send(self.client, endpoint.into(), body).await
    }

    async fn bulk_traffic_estimation(
        &self,
        targets: &[String],
        request: DomainRequest,
    ) -> RequestOutcome<Value> {
        let endpoint = Endpoint::BulkTrafficEstimation;
        let body = json!({
            "targets": targets,
            "location_name": request.location_name,
            "language_code": request.language_code,
            "ignore_synonyms": request.ignore_synonyms.unwrap_or(true),
        });

        send(self.client, endpoint.into(), body).await
    }

    async fn historical_serp(&self, keyword: &str, request: DomainRequest) -> RequestOutcome<Value> {
        let endpoint = Endpoint::HistoricalSerp;
        let body = json!({
            "keyword": keyword,
            "location_name": request.location_name,
            "language_code": request.language_code,
        });

        send(self.client, endpoint.into(), body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockResponse, MockTransport};
    use crate::DataForSeoConfig;
    use std::sync::Arc;
    use std::time::Duration;

    fn client(transport: Arc<MockTransport>) -> DataForSeoClient {
        DataForSeoClient::builder()
            .config(
                DataForSeoConfig::builder()
                    .login("user@example.com")
                    .password("0123456789abcdef")
                    .base_url("https://api.test")
                    .build(),
            )
            .transport(transport)
            .build()
            .unwrap()
    }

    fn transport() -> Arc<MockTransport> {
        Arc::new(MockTransport::new().with_default_response(MockResponse::task_result(json!([]))))
    }

    #[tokio::test]
    async fn test_ranked_keywords_body() {
        let transport = transport();
        let client = client(transport.clone());

        let outcome = client
            .labs()
            .ranked_keywords(DomainRequest::new("example.com").with_limit(100))
            .await;
        assert!(outcome.success);

        let sent = transport.last_request().unwrap();
        assert_eq!(
            sent.url,
            "https://api.test/v3/dataforseo_labs/google/ranked_keywords/live.ai"
        );
        assert_eq!(
            sent.json(),
            json!([{
                "target": "example.com",
                "location_name": "United States",
                "language_code": "en",
                "ignore_synonyms": true,
                "limit": 100,
                "offset": 0,
            }])
        );
    }

    #[tokio::test]
    async fn test_domain_rank_overview_has_no_listing_fields() {
        let transport = transport();
        let client = client(transport.clone());

        client
            .labs()
            .domain_rank_overview(DomainRequest::new("example.com"))
            .await;

        let body = transport.last_request().unwrap().json();
        assert!(body[0].get("limit").is_none());
    }

    #[tokio::test]
    async fn test_domain_intersection_key_includes_both_targets() {
        let transport = transport();
        let client = client(transport.clone());
        let labs = client.labs();

        labs.domain_intersection("a.com", "b.com", DomainRequest::new("")).await;
        labs.domain_intersection("a.com", "c.com", DomainRequest::new("")).await;
        let cached = labs
            .domain_intersection("A.com", "b.com", DomainRequest::new(""))
            .await;

        assert_eq!(transport.request_count(), 2);
        assert!(cached.cache_hit);
    }

    #[tokio::test]
    async fn test_limit_and_offset_get_their_own_entries() {
        let transport = transport();
        let client = client(transport.clone());
        let labs = client.labs();

        let small = labs.ranked_keywords(DomainRequest::new("example.com")).await;
        let big = labs
            .ranked_keywords(DomainRequest::new("example.com").with_limit(100))
            .await;
        let next_page = labs
            .ranked_keywords(DomainRequest::new("example.com").with_limit(100).with_offset(100))
            .await;
        let big_again = labs
            .ranked_keywords(DomainRequest::new("Example.com").with_limit(100))
            .await;

        assert!(!small.cache_hit);
        assert!(!big.cache_hit);
        assert!(!next_page.cache_hit);
        assert!(big_again.cache_hit);
        assert_eq!(transport.request_count(), 3);
        assert_eq!(transport.last_request().unwrap().json()[0]["offset"], 100);
    }

    #[tokio::test]
    async fn test_language_and_subdomains_change_the_entry() {
        let transport = transport();
        let client = client(transport.clone());
        let labs = client.labs();

        labs.domain_rank_overview(DomainRequest::new("example.com")).await;
        labs.domain_rank_overview(DomainRequest::new("example.com").with_language("es"))
            .await;
        let mut with_subdomains = DomainRequest::new("example.com");
        with_subdomains.include_subdomains = Some(true);
        labs.domain_rank_overview(with_subdomains).await;

        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_with_endpoint_ttl() {
        let transport = transport();
        let client = client(transport.clone());
        let labs = client.labs();

        labs.historical_serp("rust", DomainRequest::new("")).await;
        tokio::time::advance(Endpoint::HistoricalSerp.cache_ttl() - Duration::from_secs(1)).await;
        assert!(labs.historical_serp("rust", DomainRequest::new("")).await.cache_hit);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(!labs.historical_serp("rust", DomainRequest::new("")).await.cache_hit);
        assert_eq!(transport.request_count(), 2);
    }
}
