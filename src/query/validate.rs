//! Decoding and structural checks for request bodies.
//!
//! Validation is pure: it hands back either the decoded value or a
//! [`ValidationFailure`] and leaves rendering to the caller.

use crate::query::error::{FieldError, ValidationFailure, ValidationResult};
use crate::query::types::{SearchFilter, SearchRequest, Sort, TagsValuesRequest, Timeframe};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// Field constraints a decoded request must satisfy before dispatch.
pub trait WellFormed {
    /// Every violated constraint, in field order. Empty means dispatchable.
    fn violations(&self) -> Vec<FieldError>;
}

/// Decode `body` as JSON into `T` and check its constraints.
pub fn validate_body<T>(body: &[u8]) -> ValidationResult<T>
where
    T: DeserializeOwned + WellFormed,
{
    let value: T =
        serde_json::from_slice(body).map_err(|e| ValidationFailure::Malformed(e.to_string()))?;
    check(value)
}

/// Like [`validate_body`], but an empty, whitespace-only or `null` body
/// decodes to `T::default()`.
pub fn validate_optional_body<T>(body: &[u8]) -> ValidationResult<T>
where
    T: DeserializeOwned + WellFormed + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return check(T::default());
    }
    let value: Option<T> =
        serde_json::from_slice(body).map_err(|e| ValidationFailure::Malformed(e.to_string()))?;
    check(value.unwrap_or_default())
}

fn check<T: WellFormed>(value: T) -> ValidationResult<T> {
    let violations = value.violations();
    if violations.is_empty() { Ok(value) } else { Err(ValidationFailure::Invalid(violations)) }
}

impl WellFormed for SearchRequest {
    fn violations(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        timeframe_violations("timeframe", &self.timeframe, &mut errors);
        filter_violations(&self.search_filters, &mut errors);
        sort_violations(&self.sort, &mut errors);
        errors
    }
}

impl WellFormed for TagsValuesRequest {
    fn violations(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Some(timeframe) = &self.timeframe {
            timeframe_violations("timeframe", timeframe, &mut errors);
        }
        filter_violations(&self.search_filters, &mut errors);
        errors
    }
}

fn timeframe_violations(path: &str, timeframe: &Timeframe, out: &mut Vec<FieldError>) {
    if !timeframe.is_ordered() {
        out.push(FieldError::new(path, "startTime must not be after endTime"));
    }
}

fn filter_violations(filters: &[SearchFilter], out: &mut Vec<FieldError>) {
    for (index, filter) in filters.iter().enumerate() {
        match filter {
            SearchFilter::KeyValue(kv) => {
                collect(&format!("searchFilters[{index}].keyValueFilter"), kv.validate(), out)
            },
        }
    }
}

fn sort_violations(sort: &[Sort], out: &mut Vec<FieldError>) {
    for (index, entry) in sort.iter().enumerate() {
        collect(&format!("sort[{index}]"), entry.validate(), out);
    }
}

/// Flatten `validator` errors into path-addressed field errors.
fn collect(prefix: &str, result: Result<(), ValidationErrors>, out: &mut Vec<FieldError>) {
    let Err(errors) = result else {
        return;
    };

    let mut flattened: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            let path = format!("{prefix}.{field}");
            field_errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                FieldError::new(path.clone(), message)
            })
        })
        .collect();
    // field_errors() is a HashMap
    flattened.sort_by(|a, b| a.field.cmp(&b.field));
    out.extend(flattened);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::types::Operator;

    #[test]
    fn test_valid_search_request() {
        let body = br#"{
            "timeframe": { "startTime": 1, "endTime": 2 },
            "searchFilters": [
                { "keyValueFilter": { "key": "span.name", "operator": "equals", "value": "x" } }
            ]
        }"#;

        let request: SearchRequest = validate_body(body).unwrap();
        assert_eq!(request.search_filters.len(), 1);
        let SearchFilter::KeyValue(filter) = &request.search_filters[0];
        assert_eq!(filter.operator, Operator::Equals);
    }

    #[test]
    fn test_missing_timeframe_is_malformed() {
        let result = validate_body::<SearchRequest>(br#"{ "searchFilters": [] }"#);
        assert!(matches!(result, Err(ValidationFailure::Malformed(_))));
    }

    #[test]
    fn test_not_json_is_malformed() {
        let result = validate_body::<SearchRequest>(b"timeframe=1");
        assert!(matches!(result, Err(ValidationFailure::Malformed(_))));
    }

    #[test]
    fn test_field_errors_are_addressed_by_path() {
        let body = br#"{
            "timeframe": { "startTime": 9, "endTime": 2 },
            "searchFilters": [
                { "keyValueFilter": { "key": "span.name", "operator": "equals", "value": "x" } },
                { "keyValueFilter": { "key": "", "operator": "equals", "value": "y" } }
            ],
            "sort": [ { "field": "", "ascending": true } ]
        }"#;

        let failure = validate_body::<SearchRequest>(body).unwrap_err();
        let fields: Vec<&str> = failure.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["timeframe", "searchFilters[1].keyValueFilter.key", "sort[0].field"]);
        assert_eq!(failure.field_errors()[1].message, "filter key must not be empty");
    }

    #[test]
    fn test_open_ended_timeframe_is_valid() {
        let body = br#"{ "timeframe": { "startTime": 9, "endTime": 0 } }"#;
        assert!(validate_body::<SearchRequest>(body).is_ok());
    }

    #[test]
    fn test_empty_optional_body_defaults() {
        let request: TagsValuesRequest = validate_optional_body(b"").unwrap();
        assert_eq!(request, TagsValuesRequest::default());

        let request: TagsValuesRequest = validate_optional_body(b"  \n").unwrap();
        assert_eq!(request, TagsValuesRequest::default());
    }

    #[test]
    fn test_null_optional_body_defaults() {
        let request: TagsValuesRequest = validate_optional_body(b" null ").unwrap();
        assert_eq!(request, TagsValuesRequest::default());
    }

    #[test]
    fn test_optional_body_still_validates() {
        let body = br#"{ "timeframe": { "startTime": 5, "endTime": 1 } }"#;
        let result = validate_optional_body::<TagsValuesRequest>(body);
        assert!(matches!(result, Err(ValidationFailure::Invalid(_))));
    }
}
