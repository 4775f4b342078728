//! Endpoint catalog and cache TTL policy.

use std::fmt;
use std::time::Duration;

use crate::errors::{DataForSeoError, DataForSeoResult};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;

/// Group of endpoints sharing rate-limit and circuit-breaker policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointCategory {
    /// SERP API.
    Serp,
    /// Keywords Data API.
    Keywords,
    /// DataForSEO Labs API.
    Labs,
    /// On-Page API.
    OnPage,
}

impl EndpointCategory {
    /// All categories.
    pub const ALL: [EndpointCategory; 4] = [
        EndpointCategory::Serp,
        EndpointCategory::Keywords,
        EndpointCategory::Labs,
        EndpointCategory::OnPage,
    ];

    /// Returns the category label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointCategory::Serp => "serp",
            EndpointCategory::Keywords => "keywords",
            EndpointCategory::Labs => "labs",
            EndpointCategory::OnPage => "on_page",
        }
    }
}

impl fmt::Display for EndpointCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DataForSEO endpoint known to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Live organic SERP results.
    SerpOrganicLiveAdvanced,
    /// Google Ads search volume.
    SearchVolume,
    /// DataForSEO Trends explore.
    TrendsExplore,
    /// On-page content parsing.
    ContentParsing,
    /// Keywords a domain ranks for.
    RankedKeywords,
    /// Keyword ideas for seed keywords.
    KeywordIdeas,
    /// Keyword overview.
    KeywordOverview,
    /// Keywords relevant to a site.
    KeywordsForSite,
    /// Keyword difficulty for many keywords.
    BulkKeywordDifficulty,
    /// Competing domains.
    CompetitorsDomain,
    /// Domain ranking overview.
    DomainRankOverview,
    /// Subdomains of a domain.
    Subdomains,
    /// Keywords shared by two domains.
    DomainIntersection,
    /// Ranking history of a domain.
    HistoricalRankOverview,
    /// Keywords shared by pages.
    PageIntersection,
    /// Traffic estimates for many targets.
    BulkTrafficEstimation,
    /// Historical SERP snapshots.
    HistoricalSerp,
}

impl Endpoint {
    /// Returns the path template. `{name}` segments are path parameters.
    pub fn path_template(&self) -> &'static str {
        match self {
            Endpoint::SerpOrganicLiveAdvanced => "/v3/serp/{search_engine}/organic/live/advanced.ai",
            Endpoint::SearchVolume => "/v3/keywords_data/google_ads/search_volume/live.ai",
            Endpoint::TrendsExplore => "/v3/keywords_data/dataforseo_trends/explore/live.ai",
            Endpoint::ContentParsing => "/v3/on_page/content_parsing/live.ai",
            Endpoint::RankedKeywords => "/v3/dataforseo_labs/google/ranked_keywords/live.ai",
            Endpoint::KeywordIdeas => "/v3/dataforseo_labs/google/keyword_ideas/live.ai",
            Endpoint::KeywordOverview => "/v3/dataforseo_labs/google/keyword_overview/live.ai",
            Endpoint::KeywordsForSite => "/v3/dataforseo_labs/google/keywords_for_site/live.ai",
            Endpoint::BulkKeywordDifficulty => "/v3/dataforseo_labs/bulk_keyword_difficulty/live.ai",
            Endpoint::CompetitorsDomain => "/v3/dataforseo_labs/google/competitors_domain/live.ai",
            Endpoint::DomainRankOverview => "/v3/dataforseo_labs/google/domain_rank_overview/live.ai",
            Endpoint::Subdomains => "/v3/dataforseo_labs/google/subdomains/live.ai",
            Endpoint::DomainIntersection => "/v3/dataforseo_labs/google/domain_intersection/live.ai",
            Endpoint::HistoricalRankOverview => {
                "/v3/dataforseo_labs/google/historical_rank_overview/live.ai"
            }
            Endpoint::PageIntersection => "/v3/dataforseo_labs/google/page_intersection/live.ai",
            Endpoint::BulkTrafficEstimation => "/v3/dataforseo_labs/bulk_traffic_estimation/live.ai",
            Endpoint::HistoricalSerp => "/v3/dataforseo_labs/google/historical_serp/live.ai",
        }
    }

    /// Returns the endpoint's category.
    pub fn category(&self) -> EndpointCategory {
        match self {
            Endpoint::SerpOrganicLiveAdvanced => EndpointCategory::Serp,
            Endpoint::SearchVolume | Endpoint::TrendsExplore => EndpointCategory::Keywords,
            Endpoint::ContentParsing => EndpointCategory::OnPage,
            _ => EndpointCategory::Labs,
        }
    }

    /// How long a successful response stays cached.
    ///
    /// Volatile data (SERPs, trends) expires quickly; structural domain data
    /// is kept for hours.
    pub fn cache_ttl(&self) -> Duration {
        let secs = match self {
            Endpoint::SerpOrganicLiveAdvanced => 10 * MINUTE,
            Endpoint::TrendsExplore => 30 * MINUTE,
            Endpoint::SearchVolume | Endpoint::ContentParsing => HOUR,
            Endpoint::RankedKeywords | Endpoint::KeywordIdeas | Endpoint::KeywordOverview => {
                2 * HOUR
            }
            Endpoint::CompetitorsDomain
            | Endpoint::Subdomains
            | Endpoint::KeywordsForSite
            | Endpoint::PageIntersection => 4 * HOUR,
            Endpoint::DomainRankOverview | Endpoint::DomainIntersection => 6 * HOUR,
            Endpoint::BulkTrafficEstimation => 12 * HOUR,
            Endpoint::BulkKeywordDifficulty
            | Endpoint::HistoricalRankOverview
            | Endpoint::HistoricalSerp => 24 * HOUR,
        };
        Duration::from_secs(secs)
    }

    /// Returns the operation name used in logs and cache keys.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::SerpOrganicLiveAdvanced => "serp_organic",
            Endpoint::SearchVolume => "keywords_volume",
            Endpoint::TrendsExplore => "trends_explore",
            Endpoint::ContentParsing => "onpage_content",
            Endpoint::RankedKeywords => "ranked_keywords",
            Endpoint::KeywordIdeas => "keyword_ideas",
            Endpoint::KeywordOverview => "keyword_overview",
            Endpoint::KeywordsForSite => "keywords_for_site",
            Endpoint::BulkKeywordDifficulty => "keyword_difficulty",
            Endpoint::CompetitorsDomain => "competitors_domain",
            Endpoint::DomainRankOverview => "domain_rank_overview",
            Endpoint::Subdomains => "subdomains",
            Endpoint::DomainIntersection => "domain_intersection",
            Endpoint::HistoricalRankOverview => "historical_rank_overview",
            Endpoint::PageIntersection => "page_intersection",
            Endpoint::BulkTrafficEstimation => "bulk_traffic_estimation",
            Endpoint::HistoricalSerp => "historical_serp",
        }
    }
}

/// An endpoint plus the values for its path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    endpoint: Endpoint,
    path_params: Vec<(String, String)>,
}

impl EndpointDescriptor {
    /// Creates a descriptor without path parameters.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            path_params: Vec::new(),
        }
    }

    /// Adds a path parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push((name.into(), value.into()));
        self
    }

    /// Returns the endpoint.
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Path parameter values in the order they were added.
    pub fn param_values(&self) -> impl Iterator<Item = &str> {
        self.path_params.iter().map(|(_, value)| value.as_str())
    }

    /// Resolves the path, failing if any placeholder is left unfilled.
    pub fn path(&self) -> DataForSeoResult<String> {
        let mut path = self.endpoint.path_template().to_string();
        for (name, value) in &self.path_params {
            path = path.replace(&format!("{{{name}}}"), value);
        }

        if path.contains('{') {
            return Err(DataForSeoError::configuration(format!(
                "Missing path parameter for {}: {path}",
                self.endpoint.name()
            )));
        }

        Ok(path)
    }
}

impl From<Endpoint> for EndpointDescriptor {
    fn from(endpoint: Endpoint) -> Self {
        Self::new(endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_parameter_substitution() {
        let descriptor = EndpointDescriptor::new(Endpoint::SerpOrganicLiveAdvanced)
            .with_param("search_engine", "bing");
        assert_eq!(
            descriptor.path().unwrap(),
            "/v3/serp/bing/organic/live/advanced.ai"
        );
    }

    #[test]
    fn test_missing_path_parameter_is_configuration_error() {
        let descriptor = EndpointDescriptor::new(Endpoint::SerpOrganicLiveAdvanced);
        assert!(matches!(
            descriptor.path(),
            Err(DataForSeoError::Configuration { .. })
        ));
    }

    #[test]
    fn test_ttl_policy_orders_by_volatility() {
        assert!(Endpoint::SerpOrganicLiveAdvanced.cache_ttl() < Endpoint::SearchVolume.cache_ttl());
        assert!(Endpoint::TrendsExplore.cache_ttl() < Endpoint::DomainRankOverview.cache_ttl());
        assert_eq!(
            Endpoint::HistoricalSerp.cache_ttl(),
            Duration::from_secs(24 * 60 * 60)
        );
    }

    #[test]
    fn test_categories() {
        assert_eq!(Endpoint::SearchVolume.category(), EndpointCategory::Keywords);
        assert_eq!(Endpoint::ContentParsing.category(), EndpointCategory::OnPage);
        assert_eq!(Endpoint::Subdomains.category(), EndpointCategory::Labs);
        assert_eq!(
            Endpoint::SerpOrganicLiveAdvanced.category(),
            EndpointCategory::Serp
        );
    }
}
