//! Query classification and entity extraction for chat enrichment.
//!
//! Both are heuristics: keyword lists and regular expressions, with no
//! validation of what they match.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// What a free-text question is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    /// Keyword volume or metrics.
    Keyword,
    /// A website's rankings.
    Domain,
    /// Search result pages.
    Serp,
    /// Competing domains.
    Competitor,
    /// Interest over time.
    Trend,
    /// Anything else.
    General,
}

impl QueryType {
    /// Returns the lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Keyword => "keyword",
            QueryType::Domain => "domain",
            QueryType::Serp => "serp",
            QueryType::Competitor => "competitor",
            QueryType::Trend => "trend",
            QueryType::General => "general",
        }
    }
}

// Checked in order; the first category with a match wins.
const VOCABULARY: &[(QueryType, &[&str])] = &[
    (
        QueryType::Keyword,
        &["keyword", "palabra clave", "palabras clave", "search volume", "volumen de búsqueda"],
    ),
    (QueryType::Domain, &["dominio", "domain", "website", "sitio"]),
    (QueryType::Serp, &["serp", "resultados", "posicionamiento", "ranking"]),
    (QueryType::Competitor, &["competencia", "competidor", "competitor"]),
    (QueryType::Trend, &["tendencia", "trend"]),
];

/// Classifies `text` by case-insensitive vocabulary match.
pub fn detect_query_type(text: &str) -> QueryType {
    let text = text.to_lowercase();
    VOCABULARY
        .iter()
        .find(|(_, terms)| terms.iter().any(|term| text.contains(term)))
        .map_or(QueryType::General, |(query_type, _)| *query_type)
}

/// Entities pulled out of a question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Entities {
    /// Quoted phrases, or `keyword:` tokens when nothing is quoted.
    pub keywords: Vec<String>,
    /// Domains without scheme or `www.`, deduplicated.
    pub domains: Vec<String>,
    /// Capitalized phrases after `in`, `en` or `para`.
    pub locations: Vec<String>,
}

impl Entities {
    /// True when no keyword and no domain was found.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty() && self.domains.is_empty()
    }
}

#[allow(clippy::expect_used)]
static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]+)""#).expect("valid regex"));

#[allow(clippy::expect_used)]
static KEYWORD_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)keyword:\s*(\S+)").expect("valid regex"));

#[allow(clippy::expect_used)]
static DOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?([a-z0-9-]+(?:\.[a-z0-9-]+)*\.[a-z]{2,})")
        .expect("valid regex")
});

#[allow(clippy::expect_used)]
static LOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?i:en|in|para)\s+(\p{Lu}\p{Ll}+(?:\s+\p{Lu}\p{Ll}+)*)").expect("valid regex")
});

/// Extracts keywords, domains and locations from `text`.
pub fn extract_entities(text: &str) -> Entities {
    let captures = |re: &Regex| -> Vec<String> {
        re.captures_iter(text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    };

    let mut keywords = captures(&QUOTED);
    if keywords.is_empty() {
        keywords = captures(&KEYWORD_PREFIX);
    }

    let mut domains: Vec<String> = Vec::new();
    for domain in captures(&DOMAIN) {
        let domain = domain.to_lowercase();
        if !domains.contains(&domain) {
            domains.push(domain);
        }
    }

    Entities {
        keywords,
        domains,
        locations: captures(&LOCATION),
    }
}
