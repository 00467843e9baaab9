//! Common test utilities for Ferry integration tests.
//!
//! This module provides:
//! - `TestEnv`: isolated working and home directories plus CLI helpers
//! - `UploadStub`: a one-shot HTTP endpoint that records what it received

#![allow(dead_code)]

pub mod env;
pub mod http_stub;

pub use env::*;
pub use http_stub::*;
