//! High-level SEO analyses built on the semantic operations.
//!
//! Every analysis flattens the provider envelope into a small typed shape
//! and, on failure, replaces the error with a localized message while keeping
//! the status code and typed failure.

mod messages;
mod query;

pub use messages::{Analysis, Locale};
pub use query::{detect_query_type, extract_entities, Entities, QueryType};

use serde::Serialize;
use tracing::warn;

use crate::client::DataForSeoClient;
use crate::services::{KeywordsService, LabsService, SerpService};
use crate::types::{
    first_result, first_result_items, CompetitorMetrics, DomainRequest, KeywordMetrics,
    KeywordsRequest, RankedKeyword, RequestOutcome, SerpItem, SerpRequest, TrendSeries,
    TrendsRequest, DEFAULT_LOCATION,
};

/// Ranked keywords fetched for a domain analysis.
pub const DOMAIN_KEYWORD_LIMIT: u32 = 100;
/// Competitors fetched for a competitor analysis.
pub const COMPETITOR_LIMIT: u32 = 20;
/// Ideas fetched for keyword suggestions.
pub const SUGGESTION_LIMIT: u32 = 50;
/// Organic results fetched for a SERP analysis.
pub const SERP_DEPTH: u32 = 10;

/// Organic results for one keyword.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerpAnalysis {
    /// Keyword searched.
    pub keyword: String,
    /// Organic results in rank order.
    pub results: Vec<SerpItem>,
}

/// Keywords a domain ranks for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainAnalysis {
    /// Domain analyzed.
    pub domain: String,
    /// Ranked keywords.
    pub ranked_keywords: Vec<RankedKeyword>,
}

/// Domains competing with a target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitorAnalysis {
    /// Domain analyzed.
    pub domain: String,
    /// Competing domains.
    pub competitors: Vec<CompetitorMetrics>,
}

/// Payload of any analysis, serialized without a tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LiveData {
    /// Keyword metrics.
    Keywords(Vec<KeywordMetrics>),
    /// SERP results.
    Serp(SerpAnalysis),
    /// Domain rankings.
    Domain(DomainAnalysis),
    /// Competitors.
    Competitors(CompetitorAnalysis),
    /// Trend graphs.
    Trends(Vec<TrendSeries>),
}

/// SEO analyses for a client, with localized error messages.
#[derive(Debug, Clone)]
pub struct SeoInsights {
    client: DataForSeoClient,
    locale: Locale,
}

impl SeoInsights {
    /// Creates insights with Spanish messages.
    pub fn new(client: DataForSeoClient) -> Self {
        Self {
            client,
            locale: Locale::default(),
        }
    }

    /// Sets the message locale.
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Returns the message locale.
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &DataForSeoClient {
        &self.client
    }

    /// Search volume, competition and CPC for each keyword.
    pub async fn analyze_keywords(
        &self,
        keywords: &[String],
        location: &str,
    ) -> RequestOutcome<Vec<KeywordMetrics>> {
        let request = KeywordsRequest::new(keywords.iter().cloned()).with_location(location);
        let outcome = self
            .client
            .keywords()
            .search_volume(request)
            .await
            .and_then(first_result);
        self.localize(outcome, Analysis::Keywords)
    }

    /// Top organic results for a keyword.
    pub async fn analyze_serp(&self, keyword: &str, location: &str) -> RequestOutcome<SerpAnalysis> {
        let request = SerpRequest::new(keyword)
            .with_location(location)
            .with_depth(SERP_DEPTH);
        let outcome = self
            .client
            .serp()
            .organic_live_advanced(request)
            .await
            .and_then(first_result_items)
            .map(|results| SerpAnalysis {
                keyword: keyword.to_string(),
                results,
            });
        self.localize(outcome, Analysis::Serp)
    }

    /// Keywords the domain ranks for.
    pub async fn analyze_domain(&self, domain: &str) -> RequestOutcome<DomainAnalysis> {
        let request = DomainRequest::new(domain).with_limit(DOMAIN_KEYWORD_LIMIT);
        let outcome = self
            .client
            .labs()
            .ranked_keywords(request)
            .await
            .and_then(first_result_items)
            .map(|ranked_keywords| DomainAnalysis {
                domain: domain.to_string(),
                ranked_keywords,
            });
        self.localize(outcome, Analysis::Domain)
    }

    /// Domains competing with `domain`.
    pub async fn analyze_competitors(&self, domain: &str) -> RequestOutcome<CompetitorAnalysis> {
        let request = DomainRequest::new(domain).with_limit(COMPETITOR_LIMIT);
        let outcome = self
            .client
            .labs()
            .competitors_domain(request)
            .await
            .and_then(first_result_items)
            .map(|competitors| CompetitorAnalysis {
                domain: domain.to_string(),
                competitors,
            });
        self.localize(outcome, Analysis::Competitors)
    }

    /// Keyword ideas grown from a seed keyword.
    pub async fn keyword_suggestions(
        &self,
        seed: &str,
        location: &str,
    ) -> RequestOutcome<Vec<KeywordMetrics>> {
        let request = KeywordsRequest::new([seed])
            .with_location(location)
            .with_limit(SUGGESTION_LIMIT);
        let outcome = self
            .client
            .labs()
            .keyword_ideas(request)
            .await
            .and_then(first_result_items);
        self.localize(outcome, Analysis::Suggestions)
    }

    /// Interest over time for a keyword.
    pub async fn analyze_trends(&self, keyword: &str, location: &str) -> RequestOutcome<Vec<TrendSeries>> {
        let request = TrendsRequest::new([keyword]).with_location(location);
        let outcome = self
            .client
            .keywords()
            .trends_explore(request)
            .await
            .and_then(first_result_items);
        self.localize(outcome, Analysis::Trends)
    }

    /// Runs the analysis matching `query_type` on the extracted entities.
    ///
    /// Returns `None` for [`QueryType::General`] or when the entity the
    /// analysis needs is missing.
    pub async fn lookup(
        &self,
        query_type: QueryType,
        entities: &Entities,
    ) -> Option<RequestOutcome<LiveData>> {
        let location = entities
            .locations
            .first()
            .map_or(DEFAULT_LOCATION, String::as_str);
        let keyword = entities.keywords.first();
        let domain = entities.domains.first();

        let outcome = match query_type {
            QueryType::Keyword if !entities.keywords.is_empty() => self
                .analyze_keywords(&entities.keywords, location)
                .await
                .map(LiveData::Keywords),
            QueryType::Domain => self.analyze_domain(domain?).await.map(LiveData::Domain),
            QueryType::Serp => self
                .analyze_serp(keyword?, location)
                .await
                .map(LiveData::Serp),
            QueryType::Competitor => self
                .analyze_competitors(domain?)
                .await
                .map(LiveData::Competitors),
            QueryType::Trend => self
                .analyze_trends(keyword?, location)
                .await
                .map(LiveData::Trends),
            QueryType::Keyword | QueryType::General => return None,
        };

        Some(outcome)
    }

    fn localize<T>(&self, outcome: RequestOutcome<T>, analysis: Analysis) -> RequestOutcome<T> {
        if outcome.success {
            return outcome;
        }
        warn!(
            analysis = ?analysis,
            error = outcome.error.as_deref().unwrap_or_default(),
            status = outcome.status_code,
            "Analysis failed"
        );
        outcome.with_error_message(self.locale.analysis_error(analysis))
    }
}
