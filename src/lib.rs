//! Clipforge - preview normalization and playlist building
//!
//! This library crate exposes the orchestration around `clipforge-av` for
//! the binary and for integration testing.

pub mod build;
pub mod config;
pub mod jobs;
pub mod payload;
pub mod storage;
