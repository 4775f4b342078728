//! Response envelope and the flattened shapes the insights layer produces.
//!
//! Provider items are deserialized from DataForSEO's snake_case fields and
//! serialized back out in camelCase, which is the shape chat enrichment and
//! HTTP hosts hand to their clients.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{DataForSeoError, DataForSeoResult, API_STATUS_OK};

/// DataForSEO response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskEnvelope<R> {
    /// Envelope status code.
    #[serde(default)]
    pub status_code: Option<u32>,
    /// Envelope status message.
    #[serde(default)]
    pub status_message: Option<String>,
    /// Tasks, one per posted task object.
    #[serde(default = "Vec::new")]
    pub tasks: Vec<Task<R>>,
}

/// A single task in the envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Task<R> {
    /// Task status code.
    #[serde(default)]
    pub status_code: Option<u32>,
    /// Task status message.
    #[serde(default)]
    pub status_message: Option<String>,
    /// Task results.
    pub result: Option<Vec<R>>,
}

/// A result page that wraps its rows in `items`.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemsPage<I> {
    /// Result rows.
    pub items: Option<Vec<I>>,
}

/// Fails when the envelope or its first task reports a non-OK status.
///
/// Fields that are absent are treated as OK.
pub fn check_envelope(value: &serde_json::Value) -> DataForSeoResult<()> {
    let task = value
        .get("tasks")
        .and_then(|t| t.as_array())
        .and_then(|t| t.first());

    for node in std::iter::once(value).chain(task) {
        let code = node
            .get("status_code")
            .and_then(serde_json::Value::as_u64)
            .and_then(|c| u32::try_from(c).ok());
        if let Some(code) = code.filter(|c| *c != API_STATUS_OK) {
            let message = node
                .get("status_message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown API error")
                .to_string();
            return Err(DataForSeoError::Api { code, message });
        }
    }

    Ok(())
}

/// Returns `tasks[0].result`, or an empty list when it is missing.
pub fn first_result<R: DeserializeOwned>(value: serde_json::Value) -> DataForSeoResult<Vec<R>> {
    let envelope: TaskEnvelope<R> = serde_json::from_value(value)?;
    Ok(envelope
        .tasks
        .into_iter()
        .next()
        .and_then(|task| task.result)
        .unwrap_or_default())
}

/// Returns `tasks[0].result[0].items`, or an empty list when it is missing.
pub fn first_result_items<I: DeserializeOwned>(
    value: serde_json::Value,
) -> DataForSeoResult<Vec<I>> {
    let pages: Vec<ItemsPage<I>> = first_result(value)?;
    Ok(pages
        .into_iter()
        .next()
        .and_then(|page| page.items)
        .unwrap_or_default())
}

/// Competition as reported by the provider: a 0..1 score or a level label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Competition {
    /// Numeric competition score.
    Score(f64),
    /// Level such as `LOW`, `MEDIUM` or `HIGH`.
    Level(String),
}

/// Keyword metrics row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct KeywordMetrics {
    /// Keyword.
    pub keyword: String,
    /// Average monthly searches.
    #[serde(default)]
    pub search_volume: Option<u64>,
    /// Competition.
    #[serde(default)]
    pub competition: Option<Competition>,
    /// Cost per click.
    #[serde(default)]
    pub cpc: Option<f64>,
    /// Competition index (0..100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competition_index: Option<u32>,
}

/// Organic SERP row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct SerpItem {
    /// Result title.
    #[serde(default)]
    pub title: Option<String>,
    /// Result URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Result snippet.
    #[serde(default)]
    pub description: Option<String>,
    /// Position among organic results.
    #[serde(default, alias = "rank_group")]
    pub rank: Option<u32>,
    /// Result domain.
    #[serde(default)]
    pub domain: Option<String>,
}

/// Keyword a domain ranks for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct RankedKeyword {
    /// Keyword.
    #[serde(default)]
    pub keyword: Option<String>,
    /// Ranking position.
    #[serde(default, alias = "rank_group")]
    pub rank: Option<u32>,
    /// Average monthly searches.
    #[serde(default)]
    pub search_volume: Option<u64>,
    /// Cost per click.
    #[serde(default)]
    pub cpc: Option<f64>,
}

/// Competing domain row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct CompetitorMetrics {
    /// Competitor domain.
    #[serde(default)]
    pub domain: Option<String>,
    /// Keywords shared with the target.
    #[serde(default, alias = "intersections")]
    pub common_keywords: Option<u64>,
    /// Domain rank.
    #[serde(default)]
    pub domain_rank: Option<f64>,
    /// Estimated traffic value.
    #[serde(default, alias = "etv")]
    pub traffic_value: Option<f64>,
}

/// One point of a trend graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct TrendPoint {
    /// Period start.
    #[serde(default)]
    pub date_from: Option<String>,
    /// Period end.
    #[serde(default)]
    pub date_to: Option<String>,
    /// Popularity values, one per keyword.
    #[serde(default)]
    pub values: Vec<Option<f64>>,
}

/// Trend graph for a set of keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct TrendSeries {
    /// Item type reported by the provider.
    #[serde(default, rename(deserialize = "type"))]
    pub item_type: Option<String>,
    /// Keywords the values refer to.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Graph points.
    #[serde(default, alias = "data")]
    pub points: Vec<TrendPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_result_unwraps_envelope() {
        let body = json!({
            "tasks": [{"result": [{"keyword": "seo", "search_volume": 1000, "competition": 0.5, "cpc": 1.2}]}]
        });
        let rows: Vec<KeywordMetrics> = first_result(body).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].search_volume, Some(1000));
        assert_eq!(rows[0].competition, Some(Competition::Score(0.5)));
    }

    #[test]
    fn test_missing_result_is_empty() {
        let rows: Vec<KeywordMetrics> = first_result(json!({"tasks": [{"result": null}]})).unwrap();
        assert!(rows.is_empty());
        let rows: Vec<KeywordMetrics> = first_result(json!({})).unwrap();
        assert!(rows.is_empty());
    }

    #[derive(Debug, Deserialize)]
    struct Row {
        keyword: String,
    }

    #[test]
    fn test_absent_result_and_items_need_no_default_rows() {
        let rows: Vec<Row> = first_result(json!({"tasks": [{"status_code": 20000}]})).unwrap();
        assert!(rows.is_empty());

        let items: Vec<Row> = first_result_items(json!({"tasks": [{"result": [{}]}]})).unwrap();
        assert!(items.is_empty());

        let items: Vec<Row> = first_result_items(json!({
            "tasks": [{"result": [{"items": [{"keyword": "seo"}]}]}]
        }))
        .unwrap();
        assert_eq!(items[0].keyword, "seo");
    }

    #[test]
    fn test_keyword_metrics_serialize_camel_case() {
        let row = KeywordMetrics {
            keyword: "seo".to_string(),
            search_volume: Some(1000),
            competition: Some(Competition::Level("HIGH".to_string())),
            cpc: Some(1.2),
            competition_index: None,
        };
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({"keyword": "seo", "searchVolume": 1000, "competition": "HIGH", "cpc": 1.2})
        );
    }

    #[test]
    fn test_serp_items_map_rank_group() {
        let body = json!({
            "tasks": [{"result": [{"items": [
                {"type": "organic", "rank_group": 1, "title": "SEO", "url": "https://example.com/", "domain": "example.com"}
            ]}]}]
        });
        let items: Vec<SerpItem> = first_result_items(body).unwrap();
        assert_eq!(items[0].rank, Some(1));
        let out = serde_json::to_value(&items[0]).unwrap();
        assert_eq!(out["rank"], json!(1));
    }

    #[test]
    fn test_check_envelope() {
        assert!(check_envelope(&json!({"status_code": 20000, "tasks": [{"status_code": 20000}]})).is_ok());
        assert!(check_envelope(&json!({"tasks": []})).is_ok());

        let err = check_envelope(&json!({
            "status_code": 20000,
            "tasks": [{"status_code": 40501, "status_message": "Invalid Field: 'keywords'."}]
        }))
        .unwrap_err();
        assert!(matches!(err, DataForSeoError::Api { code: 40501, .. }));
    }
}
