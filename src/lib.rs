//! Spanquery - query boundary of a distributed-tracing backend
//!
//! Spanquery normalizes span search requests into a canonical query model,
//! validates them, dispatches them to a pluggable [`reader::SpanReader`] and
//! maps the outcome onto an HTTP response contract.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod metrics;
pub mod query;
pub mod reader;
