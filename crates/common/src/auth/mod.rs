//! Caller context extraction
//!
//! The host identifies callers by an opaque principal carried in a request
//! header, and may pin the logical block height of the call.
//!
//! # Trust
//!
//! `X-Caller-Principal` is taken as-is. Nothing here verifies a signature or
//! session, so any client that reaches the gateway can act as any principal,
//! including the bound authority. The gateway must sit behind a proxy or
//! sidecar that authenticates the caller and overwrites this header (and
//! strips it from untrusted requests). Removal ownership and the optional
//! authority-only policy check are only as strong as that proxy.

use crate::errors::{AppError, Result};
use axum::{extract::FromRequestParts, http::request::Parts};
use citeledger_ledger::{BlockHeight, Principal};
use uuid::Uuid;

/// Header carrying the caller principal
pub const CALLER_HEADER: &str = "x-caller-principal";

/// Header carrying the caller-asserted block height
pub const HEIGHT_HEADER: &str = "x-block-height";

/// Header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extracted caller context available to handlers
#[derive(Debug, Clone)]
pub struct CallerContext {
    /// Calling principal
    pub caller: Principal,

    /// Block height asserted by the caller, if any
    pub height: Option<BlockHeight>,

    /// Request ID for tracing
    pub request_id: String,
}

/// Parse a principal header value; blank values are rejected
pub fn parse_principal(value: &str) -> Option<Principal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(Principal::new(trimmed))
    }
}

/// Axum extractor for CallerContext
impl<S> FromRequestParts<S> for CallerContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        // Extract request ID
        let request_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        // Extract caller principal
        let caller = parts
            .headers
            .get(CALLER_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_principal)
            .ok_or_else(|| AppError::Unauthorized {
                message: "Missing or empty X-Caller-Principal header".to_string(),
            })?;

        // Extract optional block height
        let height = match parts.headers.get(HEIGHT_HEADER) {
            None => None,
            Some(value) => Some(
                value
                    .to_str()
                    .ok()
                    .and_then(|s| s.trim().parse::<BlockHeight>().ok())
                    .ok_or_else(|| AppError::Validation {
                        message: "X-Block-Height must be a non-negative integer".to_string(),
                        field: Some(HEIGHT_HEADER.to_string()),
                    })?,
            ),
        };

        Ok(CallerContext {
            caller,
            height,
            request_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<CallerContext> {
        let (mut parts, _) = request.into_parts();
        CallerContext::from_request_parts(&mut parts, &()).await
    }

    #[test]
    fn test_parse_principal() {
        assert_eq!(parse_principal(" ST1TEST "), Some(Principal::new("ST1TEST")));
        assert_eq!(parse_principal("   "), None);
    }

    #[tokio::test]
    async fn test_extracts_caller_and_height() {
        let request = Request::builder()
            .header(CALLER_HEADER, "ST1TEST")
            .header(HEIGHT_HEADER, "42")
            .header(REQUEST_ID_HEADER, "req-1")
            .body(())
            .unwrap();

        let ctx = extract(request).await.unwrap();
        assert_eq!(ctx.caller, Principal::new("ST1TEST"));
        assert_eq!(ctx.height, Some(42));
        assert_eq!(ctx.request_id, "req-1");
    }

    #[tokio::test]
    async fn test_missing_caller_rejected() {
        let request = Request::builder().body(()).unwrap();
        assert!(matches!(
            extract(request).await,
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_bad_height_rejected() {
        let request = Request::builder()
            .header(CALLER_HEADER, "ST1TEST")
            .header(HEIGHT_HEADER, "-3")
            .body(())
            .unwrap();
        assert!(matches!(
            extract(request).await,
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_caller_header_taken_as_is() {
        // Whatever the fronting proxy forwards is the identity
        let request = Request::builder()
            .header(CALLER_HEADER, "ST2AUTHORITY")
            .body(())
            .unwrap();
        let ctx = extract(request).await.unwrap();
        assert_eq!(ctx.caller, Principal::new("ST2AUTHORITY"));
    }

    #[tokio::test]
    async fn test_height_optional() {
        let request = Request::builder()
            .header(CALLER_HEADER, "ST1TEST")
            .body(())
            .unwrap();
        let ctx = extract(request).await.unwrap();
        assert!(ctx.height.is_none());
        assert!(!ctx.request_id.is_empty());
    }
}
