//! Request body extraction
//!
//! `ApiJson` decodes a JSON body like `axum::Json` but rejects bad bodies
//! with the structured `AppError` response instead of axum's plain text.
//! `WireInt` accepts any JSON integer, so a negative id, weight or policy
//! value reaches the ledger and is rejected with the ledger's own error kind.

use crate::errors::AppError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// JSON body extractor with `AppError` rejections
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation {
            message: rejection.body_text(),
            field: None,
        }
    }
}

/// Integer as sent by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireInt {
    Unsigned(u64),
    Signed(i64),
}

impl WireInt {
    /// Value in the ledger's unsigned domain. Negative input maps to 0, which
    /// the ledger rejects exactly like any other non-positive value.
    pub fn to_ledger(self) -> u64 {
        match self {
            WireInt::Unsigned(v) => v,
            WireInt::Signed(v) => u64::try_from(v).unwrap_or(0),
        }
    }
}

impl From<u64> for WireInt {
    fn from(value: u64) -> Self {
        WireInt::Unsigned(value)
    }
}
