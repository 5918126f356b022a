//! REST gateway to the student risk backend.
//!
//! `POST /upload-file` introspects a file and `POST /process-data` ingests
//! it under a mapping. `GET /sample-format` returns the reference layout, and
//! `POST /multi-upload` merges per-source files by `student_id`. [`Gateway`] is the seam the
//! upload flow depends on; [`HttpGateway`] is the reqwest implementation.

pub mod client;
pub mod config;
pub mod detail;
pub mod error;

pub use client::{Gateway, HttpGateway};
pub use config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, GatewayConfig};
pub use detail::error_message;
pub use error::{GatewayError, Result};
