//! DataForSEO Client Library
//!
//! A resilient Rust client for the DataForSEO API. Every remote call runs
//! through a single pipeline that combines response caching, sliding-window
//! rate limiting, a circuit breaker and retry with exponential backoff.
//!
//! # Features
//!
//! - **Request pipeline**: cache, rate limit, circuit breaker, retry, network
//! - **Typed outcomes**: remote failures come back as [`RequestOutcome`] values
//! - **Semantic operations**: SERP, keywords data, Labs and on-page endpoints
//! - **Insights**: flattened keyword, SERP, domain, competitor and trend analyses
//! - **Chat enrichment**: query classification and live-data prompt blocks
//! - **Observability**: tracing setup, metrics, health status and alerts
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use integrations_dataforseo::{DataForSeoClient, SeoInsights};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DataForSeoClient::from_env()?;
//!     let insights = SeoInsights::new(client);
//!
//!     let outcome = insights
//!         .analyze_keywords(&["seo".to_string()], "United States")
//!         .await;
//!
//!     if let Some(metrics) = outcome.data {
//!         for keyword in metrics {
//!             println!("{}: {:?}", keyword.keyword, keyword.search_volume);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod cache;
pub mod chat;
pub mod client;
pub mod config;
pub mod errors;
pub mod insights;
pub mod observability;
pub mod resilience;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use chat::{ChatAssistant, ChatReply, ChatRequest, TextGenerator};
pub use client::{CacheDirective, DataForSeoClient, DataForSeoClientBuilder};
pub use config::DataForSeoConfig;
pub use errors::{DataForSeoError, DataForSeoResult};
pub use insights::{detect_query_type, extract_entities, Entities, QueryType, SeoInsights};
pub use observability::{HealthMonitor, LoggingConfig};

// Type re-exports
pub use types::endpoints::{Endpoint, EndpointCategory, EndpointDescriptor};
pub use types::outcome::RequestOutcome;

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
