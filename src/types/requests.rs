//! Request parameter types for the semantic operations.

/// Location used when none is given.
pub const DEFAULT_LOCATION: &str = "United States";

/// Language code used when none is given.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Search engine for SERP requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchEngine {
    /// Google.
    #[default]
    Google,
    /// Bing.
    Bing,
    /// Yahoo.
    Yahoo,
}

impl SearchEngine {
    /// Returns the path segment for the engine.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchEngine::Google => "google",
            SearchEngine::Bing => "bing",
            SearchEngine::Yahoo => "yahoo",
        }
    }
}

/// Device type for SERP requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    /// Desktop results.
    #[default]
    Desktop,
    /// Mobile results.
    Mobile,
}

impl Device {
    /// Returns the API value for the device.
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Desktop => "desktop",
            Device::Mobile => "mobile",
        }
    }
}

/// Parameters for a live SERP lookup.
#[derive(Debug, Clone)]
pub struct SerpRequest {
    /// Search query.
    pub keyword: String,
    /// Search engine.
    pub search_engine: SearchEngine,
    /// Location name.
    pub location_name: String,
    /// Language code.
    pub language_code: String,
    /// Number of results to fetch.
    pub depth: u32,
    /// Device type.
    pub device: Device,
    /// Maximum SERP pages to crawl.
    pub max_crawl_pages: u32,
    /// Depth for expanding "people also ask" items.
    pub people_also_ask_click_depth: Option<u32>,
}

impl SerpRequest {
    /// Creates a request for a keyword with default settings.
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            search_engine: SearchEngine::default(),
            location_name: DEFAULT_LOCATION.to_string(),
            language_code: DEFAULT_LANGUAGE.to_string(),
            depth: 100,
            device: Device::default(),
            max_crawl_pages: 1,
            people_also_ask_click_depth: None,
        }
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location_name = location.into();
        self
    }

    /// Sets the language code.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language_code = language.into();
        self
    }

    /// Sets the search engine.
    #[must_use]
    pub fn with_search_engine(mut self, engine: SearchEngine) -> Self {
        self.search_engine = engine;
        self
    }

    /// Sets the device.
    #[must_use]
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Sets the result depth.
    #[must_use]
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }
}

/// Parameters for keyword-centric endpoints.
#[derive(Debug, Clone)]
pub struct KeywordsRequest {
    /// Keywords to analyze.
    pub keywords: Vec<String>,
    /// Location name.
    pub location_name: String,
    /// Language code.
    pub language_code: String,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Result offset.
    pub offset: Option<u32>,
    /// DataForSEO filter expression.
    pub filters: Option<serde_json::Value>,
    /// Sort rules such as `"keyword_info.search_volume,desc"`.
    pub order_by: Option<Vec<String>>,
    /// Whether to include clickstream data.
    pub include_clickstream_data: Option<bool>,
}

impl KeywordsRequest {
    /// Creates a request for the given keywords.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            location_name: DEFAULT_LOCATION.to_string(),
            language_code: DEFAULT_LANGUAGE.to_string(),
            limit: None,
            offset: None,
            filters: None,
            order_by: None,
            include_clickstream_data: None,
        }
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location_name = location.into();
        self
    }

    /// Sets the language code.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language_code = language.into();
        self
    }

    /// Sets the result limit.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the result offset.
    #[must_use]
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the filter expression.
    #[must_use]
    pub fn with_filters(mut self, filters: serde_json::Value) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Sets the sort rules.
    #[must_use]
    pub fn with_order_by(mut self, order_by: Vec<String>) -> Self {
        self.order_by = Some(order_by);
        self
    }
}

/// Parameters for the trends explore endpoint.
#[derive(Debug, Clone)]
pub struct TrendsRequest {
    /// Keywords to compare (up to five).
    pub keywords: Vec<String>,
    /// Location name.
    pub location_name: String,
    /// Trend source: `web`, `news` or `ecommerce`.
    pub trend_type: Option<String>,
    /// Start date (`yyyy-mm-dd`).
    pub date_from: Option<String>,
    /// End date (`yyyy-mm-dd`).
    pub date_to: Option<String>,
    /// Preset range such as `past_12_months`.
    pub time_range: Option<String>,
}

impl TrendsRequest {
    /// Creates a request for the given keywords.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            location_name: DEFAULT_LOCATION.to_string(),
            trend_type: None,
            date_from: None,
            date_to: None,
            time_range: None,
        }
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location_name = location.into();
        self
    }

    /// Sets the preset time range.
    #[must_use]
    pub fn with_time_range(mut self, time_range: impl Into<String>) -> Self {
        self.time_range = Some(time_range.into());
        self
    }
}

/// Parameters for domain-centric Labs endpoints.
#[derive(Debug, Clone)]
pub struct DomainRequest {
    /// Target domain or page.
    pub target: String,
    /// Location name.
    pub location_name: String,
    /// Language code.
    pub language_code: String,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Result offset.
    pub offset: Option<u32>,
    /// DataForSEO filter expression.
    pub filters: Option<serde_json::Value>,
    /// Sort rules.
    pub order_by: Option<Vec<String>>,
    /// Whether to include subdomains of the target.
    pub include_subdomains: Option<bool>,
    /// Whether to ignore keyword synonyms. Defaults to true when unset.
    pub ignore_synonyms: Option<bool>,
}

impl DomainRequest {
    /// Creates a request for a target.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            location_name: DEFAULT_LOCATION.to_string(),
            language_code: DEFAULT_LANGUAGE.to_string(),
            limit: None,
            offset: None,
            filters: None,
            order_by: None,
            include_subdomains: None,
            ignore_synonyms: None,
        }
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location_name = location.into();
        self
    }

    /// Sets the language code.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language_code = language.into();
        self
    }

    /// Sets the result limit.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the result offset.
    #[must_use]
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the filter expression.
    #[must_use]
    pub fn with_filters(mut self, filters: serde_json::Value) -> Self {
        self.filters = Some(filters);
        self
    }
}

/// Parameters for on-page content parsing.
#[derive(Debug, Clone)]
pub struct OnPageRequest {
    /// Page URL.
    pub url: String,
    /// Whether to render JavaScript.
    pub enable_javascript: Option<bool>,
    /// Custom JavaScript to run on the page.
    pub custom_js: Option<String>,
    /// Custom user agent for the crawler.
    pub custom_user_agent: Option<String>,
    /// `Accept-Language` header for the crawler.
    pub accept_language: Option<String>,
}

impl OnPageRequest {
    /// Creates a request for a page.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            enable_javascript: None,
            custom_js: None,
            custom_user_agent: None,
            accept_language: None,
        }
    }

    /// Enables or disables JavaScript rendering.
    #[must_use]
    pub fn with_javascript(mut self, enabled: bool) -> Self {
        self.enable_javascript = Some(enabled);
        self
    }
}
