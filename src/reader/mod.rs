//! Span reader abstraction: the backend capability the query core dispatches to.
pub mod context;
pub mod error;

pub use context::{Done, RequestContext};
pub use error::{ReaderError, ReaderErrorKind, ReaderResult};

use crate::query::{
    AvailableTagsRequest, AvailableTagsResponse, SearchRequest, SearchResponse, TagsValuesRequest,
    TagsValuesResponse,
};
use async_trait::async_trait;

/// Read-side operations of a span storage/search engine.
///
/// One instance is shared by every in-flight request, hence `Send + Sync`.
/// Implementations should watch `ctx` during long-running work so abandoned
/// requests stop consuming backend resources.
#[async_trait]
pub trait SpanReader: Send + Sync {
    /// Find spans matching every filter of `request` within its timeframe
    async fn search(
        &self,
        ctx: &RequestContext,
        request: SearchRequest,
    ) -> ReaderResult<SearchResponse>;

    /// List every tag name the backend has indexed
    async fn get_available_tags(
        &self,
        ctx: &RequestContext,
        request: AvailableTagsRequest,
    ) -> ReaderResult<AvailableTagsResponse>;

    /// Distinct values (with counts) for the requested tag names
    async fn get_tags_values(
        &self,
        ctx: &RequestContext,
        request: TagsValuesRequest,
    ) -> ReaderResult<TagsValuesResponse>;
}

/// Reader with no storage behind it: every query matches nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReader;

#[async_trait]
impl SpanReader for NullReader {
    async fn search(
        &self,
        _ctx: &RequestContext,
        _request: SearchRequest,
    ) -> ReaderResult<SearchResponse> {
        Ok(SearchResponse::default())
    }

    async fn get_available_tags(
        &self,
        _ctx: &RequestContext,
        _request: AvailableTagsRequest,
    ) -> ReaderResult<AvailableTagsResponse> {
        Ok(AvailableTagsResponse::default())
    }

    async fn get_tags_values(
        &self,
        _ctx: &RequestContext,
        _request: TagsValuesRequest,
    ) -> ReaderResult<TagsValuesResponse> {
        Ok(TagsValuesResponse::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Timeframe;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_null_reader_returns_empty_results() {
        let reader: Arc<dyn SpanReader> = Arc::new(NullReader);
        let ctx = RequestContext::background();

        let spans = reader.search(&ctx, SearchRequest::new(Timeframe::new(0, 1))).await.unwrap();
        assert!(spans.spans.is_empty());

        let tags = reader.get_available_tags(&ctx, AvailableTagsRequest {}).await.unwrap();
        assert!(tags.tags.is_empty());

        let values = reader.get_tags_values(&ctx, TagsValuesRequest::default()).await.unwrap();
        assert!(values.is_empty());
    }
}
