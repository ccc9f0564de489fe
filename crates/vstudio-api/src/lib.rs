//! Axum HTTP API server for the studio.
//!
//! This crate provides:
//! - Multipart generation intake with an SSE progress stream
//! - Trend preset listing and generated media serving
//! - Rate limiting, request ids and security headers
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
