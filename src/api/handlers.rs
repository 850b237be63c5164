//! Route handlers for the query API.

use crate::api::state::ApiState;
use crate::metrics::{self, Outcome};
use crate::query::{
    AvailableTagsRequest, SearchRequest, TagsValuesRequest, build_trace_query,
    normalize_tags_values_request, validate_body, validate_optional_body,
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::Response,
};
use tracing::debug;

// Liveness probe, independent of the reader
pub async fn ping() -> &'static str {
    "pong"
}

pub async fn search(State(state): State<ApiState>, body: Bytes) -> Response {
    let ctx = state.request_context();
    let _guard = ctx.cancel_on_drop();

    let request = match validate_body::<SearchRequest>(&body) {
        Ok(request) => request,
        Err(failure) => {
            debug!(request_id = %ctx.request_id(), "Rejected search request: {}", failure);
            metrics::record_request("search", Outcome::Invalid);
            return state.mapper().invalid(&failure);
        },
    };

    let outcome = state.dispatcher().search(&ctx, request).await;
    metrics::record_request("search", outcome_of(&outcome));
    state.mapper().render(outcome)
}

pub async fn trace_by_id(State(state): State<ApiState>, Path(trace_id): Path<String>) -> Response {
    let ctx = state.request_context();
    let _guard = ctx.cancel_on_drop();

    let request = build_trace_query(&trace_id, state.clock());
    let outcome = state.dispatcher().search(&ctx, request).await;
    metrics::record_request("trace_by_id", outcome_of(&outcome));
    state.mapper().render(outcome)
}

pub async fn available_tags(State(state): State<ApiState>) -> Response {
    let ctx = state.request_context();
    let _guard = ctx.cancel_on_drop();

    let outcome = state.dispatcher().available_tags(&ctx, AvailableTagsRequest::default()).await;
    metrics::record_request("available_tags", outcome_of(&outcome));
    state.mapper().render(outcome)
}

pub async fn tags_values(
    State(state): State<ApiState>,
    Query(params): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Response {
    let ctx = state.request_context();
    let _guard = ctx.cancel_on_drop();

    let decoded = match validate_optional_body::<TagsValuesRequest>(&body) {
        Ok(decoded) => decoded,
        Err(failure) => {
            debug!(request_id = %ctx.request_id(), "Rejected tag values request: {}", failure);
            metrics::record_request("tags_values", Outcome::Invalid);
            return state.mapper().invalid(&failure);
        },
    };
    // Only the first `tags` value counts; a missing one behaves like an empty one
    let raw_tags = first_param(&params, "tags").unwrap_or("");
    let request = normalize_tags_values_request(raw_tags, decoded);

    let outcome = state.dispatcher().tags_values(&ctx, request).await;
    metrics::record_request("tags_values", outcome_of(&outcome));
    state.mapper().render(outcome)
}

fn first_param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
}

fn outcome_of<T, E>(result: &Result<T, E>) -> Outcome {
    if result.is_ok() { Outcome::Ok } else { Outcome::Error }
}
