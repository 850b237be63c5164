//! Transport-agnostic query core: model, normalization and validation.

pub mod clock;
pub mod error;
pub mod normalize;
pub mod responses;
pub mod types;
pub mod validate;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{FieldError, ValidationFailure, ValidationResult};
pub use normalize::{build_trace_query, normalize_tags_values_request, split_tags};
pub use responses::{AvailableTagsResponse, SearchResponse, Span, TagsValuesResponse};
pub use types::{
    AvailableTagsRequest, KeyValueFilter, Operator, SearchFilter, SearchMetadata, SearchRequest,
    Sort, TagsValuesRequest, Timeframe,
};
pub use validate::{WellFormed, validate_body, validate_optional_body};
