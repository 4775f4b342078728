//! Type definitions for the DataForSEO API.

pub mod endpoints;
pub mod outcome;
pub mod requests;
pub mod responses;

pub use endpoints::{Endpoint, EndpointCategory, EndpointDescriptor};
pub use outcome::RequestOutcome;
pub use requests::{
    Device, DomainRequest, KeywordsRequest, OnPageRequest, SearchEngine, SerpRequest,
    TrendsRequest, DEFAULT_LANGUAGE, DEFAULT_LOCATION,
};
pub use responses::{
    check_envelope, first_result, first_result_items, Competition, CompetitorMetrics,
    KeywordMetrics, RankedKeyword, SerpItem, TaskEnvelope, TrendPoint, TrendSeries,
};
