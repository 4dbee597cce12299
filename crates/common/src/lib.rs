//! CiteLedger Common Library
//!
//! Shared code for CiteLedger hosts including:
//! - Error types and HTTP mapping
//! - Configuration management
//! - Caller context and request body extraction
//! - Metrics and observability

pub mod auth;
pub mod config;
pub mod errors;
pub mod extract;
pub mod metrics;

// Re-export commonly used types
pub use auth::CallerContext;
pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use extract::{ApiJson, WireInt};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
