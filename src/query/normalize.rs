//! Builders that turn loose client input into canonical queries.

use crate::query::clock::Clock;
use crate::query::types::{KeyValueFilter, SearchRequest, TRACE_ID_KEY, TagsValuesRequest, Timeframe};

/// Search for every span of one trace, over all recorded time.
///
/// The clock is read exactly once, so the window is internally consistent.
pub fn build_trace_query(trace_id: &str, clock: &dyn Clock) -> SearchRequest {
    let now = clock.now_nanos();
    SearchRequest::new(Timeframe::open_until(now))
        .with_filter(KeyValueFilter::equals(TRACE_ID_KEY, trace_id))
}

/// Split a comma-separated tag list.
///
/// No trimming and no dropping of empty entries: `""` yields `[""]`.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_string).collect()
}

/// Apply the query-string tag list to a decoded tag-values body.
///
/// The tag list always replaces whatever the body carried, and prefixing is
/// always turned off on this path regardless of the client's flag.
pub fn normalize_tags_values_request(
    raw_tags: &str,
    mut decoded: TagsValuesRequest,
) -> TagsValuesRequest {
    decoded.tags = split_tags(raw_tags);
    decoded.auto_prefix_tags = false;
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::clock::FixedClock;
    use crate::query::types::{Operator, SearchFilter};
    use std::sync::atomic::{AtomicU64, Ordering};

    struct CountingClock {
        reads: AtomicU64,
    }

    impl Clock for CountingClock {
        fn now_nanos(&self) -> u64 {
            // Each read returns a later instant
            1_000 + self.reads.fetch_add(1, Ordering::SeqCst)
        }
    }

    #[test]
    fn test_trace_query_has_single_trace_filter() {
        let request = build_trace_query("4bf92f3577b34da6a3ce929d0e0e4736", &FixedClock(1_000));

        assert_eq!(request.timeframe.start_time, 0);
        assert_eq!(request.timeframe.end_time, 1_000);
        assert_eq!(request.search_filters.len(), 1);
        let SearchFilter::KeyValue(filter) = &request.search_filters[0];
        assert_eq!(filter.key, "span.traceId");
        assert_eq!(filter.operator, Operator::Equals);
        assert_eq!(filter.value, "4bf92f3577b34da6a3ce929d0e0e4736");
        assert!(request.sort.is_empty());
        assert!(request.metadata.is_none());
    }

    #[test]
    fn test_trace_query_reads_clock_once() {
        let clock = CountingClock { reads: AtomicU64::new(0) };
        let request = build_trace_query("abc", &clock);

        assert_eq!(clock.reads.load(Ordering::SeqCst), 1);
        assert_eq!(request.timeframe.end_time, 1_000);
        assert!(request.timeframe.end_time >= request.timeframe.start_time);
    }

    #[test]
    fn test_trace_query_window_is_ordered_at_epoch() {
        let request = build_trace_query("abc", &FixedClock(0));
        assert!(request.timeframe.end_time >= request.timeframe.start_time);
    }

    #[test]
    fn test_split_tags() {
        assert_eq!(split_tags("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(split_tags("span.name"), vec!["span.name"]);
        assert_eq!(split_tags(""), vec![""]);
        assert_eq!(split_tags("a,,b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_tags_override_body() {
        let decoded = TagsValuesRequest {
            tags: vec!["from-body".to_string()],
            auto_prefix_tags: true,
            ..Default::default()
        };

        let request = normalize_tags_values_request("a,b,c", decoded);
        assert_eq!(request.tags, vec!["a", "b", "c"]);
        assert!(!request.auto_prefix_tags);
    }

    #[test]
    fn test_empty_tags_param_yields_single_empty_tag() {
        let request = normalize_tags_values_request("", TagsValuesRequest::default());
        assert_eq!(request.tags, vec![String::new()]);
    }

    #[test]
    fn test_normalize_keeps_timeframe_and_filters() {
        let decoded = TagsValuesRequest {
            timeframe: Some(Timeframe::new(1, 2)),
            search_filters: vec![KeyValueFilter::equals("span.name", "x").into()],
            ..Default::default()
        };

        let request = normalize_tags_values_request("span.name", decoded.clone());
        assert_eq!(request.timeframe, decoded.timeframe);
        assert_eq!(request.search_filters, decoded.search_filters);
    }
}
