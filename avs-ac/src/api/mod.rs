//! HTTP API handlers for avs-ac

pub mod convert;
pub mod health;

pub use convert::convert_routes;
pub use health::health_routes;
