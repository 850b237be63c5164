//! Canonical query model handed to the span reader.
//!
//! Every shape here is plain data: construction never fails and nothing is
//! mutated once a request leaves the normalizer. Wire names are camelCase to
//! match the JSON the web client sends.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt;
use validator::Validate;

/// Attribute key holding a span's trace identifier.
pub const TRACE_ID_KEY: &str = "span.traceId";

/// Inclusive time window in nanoseconds since the Unix epoch.
///
/// `end_time == 0` is the open-ended marker used by live views: the backend
/// picks the end of the window itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeframe {
    pub start_time: u64,
    pub end_time: u64,
}

impl Timeframe {
    pub fn new(start_time: u64, end_time: u64) -> Self {
        Self { start_time, end_time }
    }

    /// Window covering everything recorded up to `now`.
    pub fn open_until(now: u64) -> Self {
        Self { start_time: 0, end_time: now }
    }

    #[inline]
    pub fn is_open_ended(&self) -> bool {
        self.end_time == 0
    }

    /// True when the bounds are ordered or the window is open-ended.
    pub fn is_ordered(&self) -> bool {
        self.is_open_ended() || self.start_time <= self.end_time
    }
}

/// Filter comparison operator.
///
/// Only [`Operator::Equals`] carries meaning inside this crate. The remaining
/// named variants mirror what backends commonly accept, and anything else is
/// kept verbatim in [`Operator::Other`] so it reaches the reader untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    Exists,
    NotExists,
    In,
    NotIn,
    Gt,
    Gte,
    Lt,
    Lte,
    Other(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::Exists => "exists",
            Operator::NotExists => "not_exists",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Other(raw) => raw,
        }
    }
}

impl From<String> for Operator {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "equals" => Operator::Equals,
            "not_equals" => Operator::NotEquals,
            "contains" => Operator::Contains,
            "not_contains" => Operator::NotContains,
            "exists" => Operator::Exists,
            "not_exists" => Operator::NotExists,
            "in" => Operator::In,
            "not_in" => Operator::NotIn,
            "gt" => Operator::Gt,
            "gte" => Operator::Gte,
            "lt" => Operator::Lt,
            "lte" => Operator::Lte,
            _ => Operator::Other(raw),
        }
    }
}

impl From<Operator> for String {
    fn from(operator: Operator) -> Self {
        match operator {
            Operator::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `key <operator> value` predicate over span attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
pub struct KeyValueFilter {
    #[validate(length(min = 1, message = "filter key must not be empty"))]
    pub key: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: String,
}

impl KeyValueFilter {
    pub fn new(key: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self { key: key.into(), operator, value: value.into() }
    }

    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, Operator::Equals, value)
    }
}

/// One predicate of a search. Filters on a request are conjunctive.
///
/// Serialized externally tagged (`{"keyValueFilter": {...}}`), so new
/// predicate kinds slot in as new variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchFilter {
    #[serde(rename = "keyValueFilter")]
    KeyValue(KeyValueFilter),
}

impl From<KeyValueFilter> for SearchFilter {
    fn from(filter: KeyValueFilter) -> Self {
        SearchFilter::KeyValue(filter)
    }
}

/// Result ordering requested by the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
pub struct Sort {
    #[validate(length(min = 1, message = "sort field must not be empty"))]
    pub field: String,
    #[serde(default)]
    pub ascending: bool,
}

/// Pagination cursor returned by the backend and echoed back by clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetadata {
    #[serde(default)]
    pub next_token: String,
}

/// The sole unit of work accepted by the reader's search operation.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub timeframe: Timeframe,
    #[serde(default)]
    pub search_filters: Vec<SearchFilter>,
    #[serde(default)]
    pub sort: Vec<Sort>,
    pub metadata: Option<SearchMetadata>,
}

impl SearchRequest {
    pub fn new(timeframe: Timeframe) -> Self {
        Self { timeframe, search_filters: Vec::new(), sort: Vec::new(), metadata: None }
    }

    pub fn with_filter(mut self, filter: impl Into<SearchFilter>) -> Self {
        self.search_filters.push(filter.into());
        self
    }
}

/// Lookup of the distinct values recorded for a set of tag names.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagsValuesRequest {
    pub timeframe: Option<Timeframe>,
    #[serde(default)]
    pub search_filters: Vec<SearchFilter>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub auto_prefix_tags: bool,
}

/// Marker request for listing every tag name the backend knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AvailableTagsRequest {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_request_wire_format() {
        let request = SearchRequest::new(Timeframe::new(10, 20))
            .with_filter(KeyValueFilter::equals("span.name", "GET /users"));

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "timeframe": { "startTime": 10, "endTime": 20 },
                "searchFilters": [
                    { "keyValueFilter": { "key": "span.name", "operator": "equals", "value": "GET /users" } }
                ],
                "sort": []
            })
        );
    }

    #[test]
    fn test_unknown_operator_is_preserved() {
        let filter: KeyValueFilter = serde_json::from_value(json!({
            "key": "span.attributes.http.route",
            "operator": "regex",
            "value": "^/api"
        }))
        .unwrap();

        assert_eq!(filter.operator, Operator::Other("regex".to_string()));
        assert_eq!(serde_json::to_value(&filter).unwrap()["operator"], "regex");
    }

    #[test]
    fn test_known_operators_parse() {
        for (raw, expected) in [
            ("equals", Operator::Equals),
            ("not_contains", Operator::NotContains),
            ("gte", Operator::Gte),
        ] {
            assert_eq!(Operator::from(raw.to_string()), expected);
            assert_eq!(expected.to_string(), raw);
        }
    }

    #[test]
    fn test_timeframe_ordering() {
        assert!(Timeframe::new(1, 2).is_ordered());
        assert!(Timeframe::new(5, 5).is_ordered());
        assert!(!Timeframe::new(6, 5).is_ordered());
        // Open-ended windows are exempt
        assert!(Timeframe::new(6, 0).is_ordered());
        assert_eq!(Timeframe::open_until(42), Timeframe::new(0, 42));
    }

    #[test]
    fn test_tags_values_request_defaults() {
        let request: TagsValuesRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, TagsValuesRequest::default());
        assert!(!request.auto_prefix_tags);
    }
}
