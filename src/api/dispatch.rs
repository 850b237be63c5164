//! Hands validated queries to the span reader.

use crate::metrics::{self, MetricsTimer};
use crate::query::{
    AvailableTagsRequest, AvailableTagsResponse, SearchRequest, SearchResponse, TagsValuesRequest,
    TagsValuesResponse,
};
use crate::reader::{ReaderError, RequestContext, SpanReader};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Backend(#[from] ReaderError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;

/// Routes queries to the shared reader.
///
/// No retries and no timeouts here: `ctx` is passed through as given and
/// reader failures come back unchanged apart from being tagged as backend
/// errors.
#[derive(Clone)]
pub struct Dispatcher {
    reader: Arc<dyn SpanReader>,
}

impl Dispatcher {
    pub fn new(reader: Arc<dyn SpanReader>) -> Self {
        Self { reader }
    }

    pub async fn search(
        &self,
        ctx: &RequestContext,
        request: SearchRequest,
    ) -> DispatchResult<SearchResponse> {
        debug!(
            request_id = %ctx.request_id(),
            filters = request.search_filters.len(),
            start_time = request.timeframe.start_time,
            end_time = request.timeframe.end_time,
            "Dispatching span search"
        );
        let _timer = MetricsTimer::new("reader.search.duration");
        let response =
            self.reader.search(ctx, request).await.map_err(|e| failed("search", ctx, e))?;
        metrics::record_result_size("search", response.spans.len());
        Ok(response)
    }

    pub async fn available_tags(
        &self,
        ctx: &RequestContext,
        request: AvailableTagsRequest,
    ) -> DispatchResult<AvailableTagsResponse> {
        debug!(request_id = %ctx.request_id(), "Dispatching available tags lookup");
        let _timer = MetricsTimer::new("reader.available_tags.duration");
        let response = self
            .reader
            .get_available_tags(ctx, request)
            .await
            .map_err(|e| failed("available_tags", ctx, e))?;
        metrics::record_result_size("available_tags", response.tags.len());
        Ok(response)
    }

    pub async fn tags_values(
        &self,
        ctx: &RequestContext,
        request: TagsValuesRequest,
    ) -> DispatchResult<TagsValuesResponse> {
        debug!(request_id = %ctx.request_id(), tags = ?request.tags, "Dispatching tag values lookup");
        let _timer = MetricsTimer::new("reader.tags_values.duration");
        let response = self
            .reader
            .get_tags_values(ctx, request)
            .await
            .map_err(|e| failed("tags_values", ctx, e))?;
        metrics::record_result_size("tags_values", response.0.len());
        Ok(response)
    }
}

fn failed(operation: &str, ctx: &RequestContext, error: ReaderError) -> DispatchError {
    warn!(
        request_id = %ctx.request_id(),
        operation,
        kind = error.kind().as_str(),
        "Span reader failed: {}",
        error
    );
    DispatchError::Backend(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Timeframe;
    use crate::reader::{ReaderErrorKind, ReaderResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FlakyReader {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SpanReader for FlakyReader {
        async fn search(
            &self,
            _ctx: &RequestContext,
            _request: SearchRequest,
        ) -> ReaderResult<SearchResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ReaderError::unavailable("index offline"))
        }

        async fn get_available_tags(
            &self,
            _ctx: &RequestContext,
            _request: AvailableTagsRequest,
        ) -> ReaderResult<AvailableTagsResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AvailableTagsResponse::default())
        }

        async fn get_tags_values(
            &self,
            ctx: &RequestContext,
            _request: TagsValuesRequest,
        ) -> ReaderResult<TagsValuesResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ctx.run(std::future::pending()).await
        }
    }

    #[tokio::test]
    async fn test_backend_error_is_not_retried() {
        let reader = Arc::new(FlakyReader::default());
        let dispatcher = Dispatcher::new(reader.clone());

        let result = dispatcher
            .search(&RequestContext::background(), SearchRequest::new(Timeframe::new(0, 1)))
            .await;

        let DispatchError::Backend(error) = result.unwrap_err();
        assert_eq!(error.kind(), ReaderErrorKind::Unavailable);
        assert_eq!(error.to_string(), "index offline");
        assert_eq!(reader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_context_reaches_reader() {
        let reader = Arc::new(FlakyReader::default());
        let dispatcher = Dispatcher::new(reader);
        let ctx = RequestContext::background();
        ctx.token().cancel();

        let result = dispatcher.tags_values(&ctx, TagsValuesRequest::default()).await;
        let DispatchError::Backend(error) = result.unwrap_err();
        assert_eq!(error.kind(), ReaderErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let dispatcher = Dispatcher::new(Arc::new(FlakyReader::default()));
        let tags = dispatcher
            .available_tags(&RequestContext::background(), AvailableTagsRequest {})
            .await
            .unwrap();
        assert!(tags.tags.is_empty());
    }
}
