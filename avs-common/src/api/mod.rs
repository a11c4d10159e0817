//! Shared HTTP API types
//!
//! Pure serde types used by both services; each service wraps them in its
//! own axum handlers.

pub mod types;

pub use types::{EndpointInfo, ErrorBody, ServiceInfo};
