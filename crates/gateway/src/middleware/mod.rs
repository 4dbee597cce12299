//! Gateway middleware

pub mod request_metrics;
