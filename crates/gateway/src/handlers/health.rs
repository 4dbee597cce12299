//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    pub ledger: CheckResult,
    pub authority_bound: bool,
    pub height: u64,
}

#[derive(Serialize)]
pub struct CheckResult {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Liveness probe - always returns healthy if server is running
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// Readiness probe - audits aggregate consistency
pub async fn ready(State(state): State<AppState>) -> Json<ReadyResponse> {
    let (audit, authority_bound) = state
        .ledger
        .read(|ledger| (ledger.audit(), ledger.config().authority.is_some()))
        .await;

    let ledger_check = match audit {
        Ok(()) => CheckResult {
            status: "up".to_string(),
            error: None,
        },
        Err(e) => {
            tracing::error!(error = %e, "Ledger audit failed");
            CheckResult {
                status: "down".to_string(),
                error: Some(e.to_string()),
            }
        }
    };

    let ready = ledger_check.status == "up";

    Json(ReadyResponse {
        status: if ready { "ready" } else { "not_ready" }.to_string(),
        checks: HealthChecks {
            ledger: ledger_check,
            authority_bound,
            height: state.clock.current(),
        },
    })
}
