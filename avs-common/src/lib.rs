//! # AVS Common Library
//!
//! Shared code for both AVS services:
//! - Error type used across crates
//! - Configuration resolution (ENV -> TOML -> default)
//! - Tracing subscriber setup
//! - Audio transcoding via the external codec tool
//! - Service metadata types for `/` and `/health`

pub mod api;
pub mod audio;
pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
