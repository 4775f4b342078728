//! Semantic operations over the DataForSEO endpoints.
//!
//! Each service builds the task body for its endpoints, derives a cache key
//! from the normalized parameters and sends the call through
//! [`DataForSeoClient::request`](crate::DataForSeoClient::request).

mod keywords;
mod labs;
mod on_page;
mod serp;

pub use keywords::{DefaultKeywordsService, KeywordsService};
pub use labs::{DefaultLabsService, LabsService};
pub use on_page::{DefaultOnPageService, OnPageService};
pub use serp::{DefaultSerpService, SerpService};

use serde_json::Value;

use crate::client::{CacheDirective, DataForSeoClient};
use crate::types::{EndpointDescriptor, RequestOutcome};

/// Result limit used by list endpoints when the caller sets none.
pub const DEFAULT_LIMIT: u32 = 10;

/// Wraps one task object in the array the API expects, dropping null fields.
pub(crate) fn task(body: Value) -> Value {
    let body = match body {
        Value::Object(mut fields) => {
            fields.retain(|_, value| !value.is_null());
            Value::Object(fields)
        }
        other => other,
    };
    Value::Array(vec![body])
}

/// Builds the cache key for a call.
///
/// The key is the operation name, then its path parameters, then every
/// non-null task field sorted by name. String values are trimmed and
/// lowercased, so keys ignore case and surrounding whitespace but change
/// with any parameter that shapes the response.
pub(crate) fn cache_key(descriptor: &EndpointDescriptor, body: &Value) -> String {
    let mut key = descriptor.endpoint().name().to_string();
    for value in descriptor.param_values() {
        key.push(':');
        key.push_str(&value.trim().to_lowercase());
    }
    key.push(':');
    write_canonical(&mut key, body);
    key
}

fn write_canonical(out: &mut String, value: &Value) {
    match value {
        Value::Object(fields) => {
            let mut entries: Vec<_> = fields.iter().filter(|(_, v)| !v.is_null()).collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (name, field)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(name);
                out.push('=');
                write_canonical(out, field);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(out, item);
            }
            out.push(']');
        }
        Value::String(text) => out.push_str(&Value::String(text.trim().to_lowercase()).to_string()),
        other => out.push_str(&other.to_string()),
    }
}

/// Sends `body` as a single task, cached for the endpoint's TTL.
pub(crate) async fn send(
    client: &DataForSeoClient,
    descriptor: EndpointDescriptor,
    body: Value,
) -> RequestOutcome<Value> {
    let body = task(body);
    let key = cache_key(&descriptor, &body);
    let ttl = descriptor.endpoint().cache_ttl();
    client
        .request(descriptor, body, Some(CacheDirective::new(key).with_ttl(ttl)))
        .await
}
