//! Shared helpers for avs-common integration tests

pub mod audio_fixtures;
