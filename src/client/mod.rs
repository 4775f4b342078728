//! DataForSEO API client.
//!
//! [`DataForSeoClient::request`] is the single pipeline every remote call
//! goes through: configuration check, cache lookup, single-flight join, rate
//! limiting, circuit breaker, retry and finally one network attempt.

mod in_flight;

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, error};

use self::in_flight::InFlightRequests;
use crate::auth::{AuthManager, BasicAuthManager};
use crate::cache::{CacheConfig, CacheManager, CacheStats};
use crate::config::DataForSeoConfig;
use crate::errors::DataForSeoResult;
use crate::observability::{InMemoryMetricsCollector, MetricsCollector};
use crate::resilience::{CircuitState, ResilienceConfig, ResilienceOrchestrator};
use crate::services::{
    DefaultKeywordsService, DefaultLabsService, DefaultOnPageService, DefaultSerpService,
    KeywordsService, LabsService, OnPageService, SerpService,
};
use crate::transport::{HttpTransport, ReqwestTransport, TransportConfig};
use crate::types::{check_envelope, Endpoint, EndpointCategory, EndpointDescriptor, RequestOutcome};

/// Where and for how long a response is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDirective {
    /// Cache key.
    pub key: String,
    /// TTL, or the cache default when `None`.
    pub ttl: Option<Duration>,
}

impl CacheDirective {
    /// Caches under `key` with the default TTL.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ttl: None,
        }
    }

    /// Sets the TTL.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

/// The main DataForSEO client. Cloning is cheap and clones share all state.
#[derive(Clone)]
pub struct DataForSeoClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: DataForSeoConfig,
    config_status: DataForSeoResult<()>,
    auth: BasicAuthManager,
    transport: Arc<dyn HttpTransport>,
    resilience: ResilienceOrchestrator,
    cache: CacheManager<Value>,
    metrics: Arc<dyn MetricsCollector>,
    in_flight: InFlightRequests,
    deduplicate: bool,
}

impl DataForSeoClient {
    /// Creates a new client with the given configuration and defaults for
    /// everything else.
    ///
    /// An invalid configuration does not fail here: the client is built and
    /// every request returns a configuration failure instead.
    pub fn new(config: DataForSeoConfig) -> DataForSeoResult<Self> {
        Self::builder().config(config).build()
    }

    /// Creates a client from `DATAFORSEO_*` environment variables.
    pub fn from_env() -> DataForSeoResult<Self> {
        Self::new(DataForSeoConfig::from_env())
    }

    /// Creates a new client builder.
    pub fn builder() -> DataForSeoClientBuilder {
        DataForSeoClientBuilder::new()
    }

    /// Runs one request through the pipeline.
    ///
    /// Never returns an error: failures are reported in the outcome. With a
    /// cache directive, a fresh cached payload is returned without touching
    /// the network and concurrent calls for the same key share one upstream
    /// call.
    pub async fn request(
        &self,
        endpoint: EndpointDescriptor,
        body: Value,
        cache: Option<CacheDirective>,
    ) -> RequestOutcome<Value> {
        let started = Instant::now();
        let category = endpoint.endpoint().category();

        let (result, cache_hit) = self.dispatch(endpoint, body, cache).await;
        let elapsed = started.elapsed();

        let metrics = &self.inner.metrics;
        metrics.record_request(category.as_str(), elapsed, result.is_ok());
        if cache_hit {
            metrics.record_cache_hit(category.as_str());
        }

        match result {
            Ok(data) if cache_hit => RequestOutcome::cached(data, elapsed),
            Ok(data) => RequestOutcome::success(data, elapsed),
            Err(err) => RequestOutcome::failure(err, elapsed),
        }
    }

    async fn dispatch(
        &self,
        descriptor: EndpointDescriptor,
        body: Value,
        cache: Option<CacheDirective>,
    ) -> (DataForSeoResult<Value>, bool) {
        let inner = &self.inner;
        if let Err(err) = &inner.config_status {
            return (Err(err.clone()), false);
        }

        let endpoint = descriptor.endpoint();
        let url = match descriptor.path() {
            Ok(path) => inner.config.endpoint_url(&path),
            Err(err) => return (Err(err), false),
        };

        let Some(directive) = cache else {
            return (Arc::clone(inner).execute_remote(endpoint, url, body, None).await, false);
        };

        if let Some(data) = inner.cache.get(&directive.key) {
            debug!(key = %directive.key, endpoint = endpoint.name(), "Cache hit");
            return (Ok(data), true);
        }

        if !inner.deduplicate {
            return (
                Arc::clone(inner)
                    .execute_remote(endpoint, url, body, Some(directive))
                    .await,
                false,
            );
        }

        let key = directive.key.clone();
        let owner = Arc::clone(inner);
        let (result, joined) = inner
            .in_flight
            .run(&key, move || owner.execute_remote(endpoint, url, body, Some(directive)))
            .await;
        if joined {
            debug!(key = %key, endpoint = endpoint.name(), "Joined in-flight request");
        }
        (result, false)
    }

    /// Returns the SERP service.
    pub fn serp(&self) -> impl SerpService + '_ {
        DefaultSerpService::new(self)
    }

    /// Returns the keywords data service.
    pub fn keywords(&self) -> impl KeywordsService + '_ {
        DefaultKeywordsService::new(self)
    }

    /// Returns the Labs service.
    pub fn labs(&self) -> impl LabsService + '_ {
        DefaultLabsService::new(self)
    }

    /// Returns the on-page service.
    pub fn on_page(&self) -> impl OnPageService + '_ {
        DefaultOnPageService::new(self)
    }

    /// Drops every cached response.
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    /// Returns cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.stats()
    }

    /// Returns the state of the breaker guarding `category`.
    pub fn circuit_state(&self, category: EndpointCategory) -> CircuitState {
        self.inner.resilience.circuit_breaker(category).state()
    }

    /// Returns the resilience orchestrator.
    pub fn resilience(&self) -> &ResilienceOrchestrator {
        &self.inner.resilience
    }

    /// Returns the metrics collector.
    pub fn metrics(&self) -> Arc<dyn MetricsCollector> {
        Arc::clone(&self.inner.metrics)
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &DataForSeoConfig {
        &self.inner.config
    }
}

impl std::fmt::Debug for DataForSeoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataForSeoClient")
            .field("config", &self.inner.config)
            .field("config_valid", &self.inner.config_status.is_ok())
            .field("deduplicate", &self.inner.deduplicate)
            .finish_non_exhaustive()
    }
}

impl ClientInner {
    /// Resilience-wrapped upstream call. Successful payloads are cached under
    /// the directive before being returned, so every joined waiter sees the
    /// entry once it resolves.
    async fn execute_remote(
        self: Arc<Self>,
        endpoint: Endpoint,
        url: String,
        body: Value,
        directive: Option<CacheDirective>,
    ) -> DataForSeoResult<Value> {
        let payload = Bytes::from(serde_json::to_vec(&body)?);

        let result = self
            .resilience
            .execute(endpoint.category(), endpoint.name(), || {
                self.send_once(&url, payload.clone())
            })
            .await;

        if let (Ok(data), Some(directive)) = (&result, directive) {
            self.cache.set(directive.key, data.clone(), directive.ttl);
        }

        result
    }

    async fn send_once(&self, url: &str, payload: Bytes) -> DataForSeoResult<Value> {
        let response = self
            .transport
            .post(url, self.auth.get_headers(), payload)
            .await?;

        let data: Value = serde_json::from_slice(&response.body)?;
        check_envelope(&data)?;
        Ok(data)
    }
}

/// Builder for the DataForSEO client.
pub struct DataForSeoClientBuilder {
    config: Option<DataForSeoConfig>,
    resilience_config: ResilienceConfig,
    cache_config: CacheConfig,
    transport: Option<Arc<dyn HttpTransport>>,
    metrics: Option<Arc<dyn MetricsCollector>>,
    deduplicate_in_flight: bool,
}

impl Default for DataForSeoClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DataForSeoClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            config: None,
            resilience_config: ResilienceConfig::default(),
            cache_config: CacheConfig::default(),
            transport: None,
            metrics: None,
            deduplicate_in_flight: true,
        }
    }

    /// Sets the configuration. Defaults to [`DataForSeoConfig::from_env`].
    pub fn config(mut self, config: DataForSeoConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the resilience configuration.
    pub fn resilience_config(mut self, config: ResilienceConfig) -> Self {
        self.resilience_config = config;
        self
    }

    /// Sets the cache configuration.
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Uses a custom transport instead of reqwest.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the metrics collector.
    pub fn metrics(mut self, metrics: Arc<dyn MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Enables or disables single-flight joining of identical keyed calls.
    pub fn deduplicate_in_flight(mut self, enabled: bool) -> Self {
        self.deduplicate_in_flight = enabled;
        self
    }

    /// Builds the client.
    ///
    /// Fails only when the HTTP client cannot be created.
    pub fn build(self) -> DataForSeoResult<DataForSeoClient> {
        let config = self.config.unwrap_or_else(DataForSeoConfig::from_env);

        let config_status = config.validate();
        if let Err(err) = &config_status {
            error!(error = %err, "Invalid DataForSEO configuration, requests will fail");
        }

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::with_config(TransportConfig::from(&config))?),
        };

        let metrics = self
            .metrics
            .unwrap_or_else(|| Arc::new(InMemoryMetricsCollector::new()));

        Ok(DataForSeoClient {
            inner: Arc::new(ClientInner {
                auth: BasicAuthManager::new(&config),
                config,
                config_status,
                transport,
                resilience: ResilienceOrchestrator::with_metrics(
                    self.resilience_config,
                    Arc::clone(&metrics),
                ),
                cache: CacheManager::new(self.cache_config),
                metrics,
                in_flight: InFlightRequests::new(),
                deduplicate: self.deduplicate_in_flight,
            }),
        })
    }
}
