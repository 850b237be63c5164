//! Typed reader results shared by every adapter.

use crate::query::types::SearchMetadata;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    #[default]
    Unspecified,
    Internal,
    Server,
    Client,
    Producer,
    Consumer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    #[default]
    Unset,
    Ok,
    Error,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpanStatus {
    pub code: StatusCode,
    pub message: Option<String>,
}

/// A recorded unit of work as returned by the reader.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub trace_id: String,
    pub span_id: String,
    pub parent_span_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub kind: SpanKind,
    pub start_time_unix_nano: u64,
    pub end_time_unix_nano: u64,
    #[serde(default)]
    pub status: SpanStatus,
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
    #[serde(default)]
    pub resource: BTreeMap<String, Value>,
}

impl Span {
    pub fn duration_nanos(&self) -> u64 {
        self.end_time_unix_nano.saturating_sub(self.start_time_unix_nano)
    }
}

/// Result of a search. A search matching nothing is an empty `spans` list,
/// never an error.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub spans: Vec<Span>,
    pub metadata: Option<SearchMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub tag_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AvailableTagsResponse {
    pub tags: Vec<TagInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagValueInfo {
    pub value: Value,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TagValues {
    pub values: Vec<TagValueInfo>,
}

/// Values per requested tag name, keyed and ordered by tag name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagsValuesResponse(pub BTreeMap<String, TagValues>);

impl TagsValuesResponse {
    pub fn get(&self, tag: &str) -> Option<&TagValues> {
        self.0.get(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_search_response_shape() {
        let value = serde_json::to_value(SearchResponse::default()).unwrap();
        assert_eq!(value, json!({ "spans": [] }));
    }

    #[test]
    fn test_tags_values_response_is_a_plain_map() {
        let mut values = BTreeMap::new();
        values.insert(
            "span.name".to_string(),
            TagValues { values: vec![TagValueInfo { value: json!("GET /"), count: 3 }] },
        );
        let response = TagsValuesResponse(values);

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "span.name": { "values": [ { "value": "GET /", "count": 3 } ] } })
        );
        assert_eq!(response.get("span.name").map(|v| v.values.len()), Some(1));
    }

    #[test]
    fn test_span_duration_saturates() {
        let span = Span { start_time_unix_nano: 10, end_time_unix_nano: 4, ..Default::default() };
        assert_eq!(span.duration_nanos(), 0);
    }
}
