//! Policy handlers: citation limit and reward base

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{handlers::execute, AppState};
use citeledger_common::{
    auth::CallerContext,
    errors::Result,
    extract::{ApiJson, WireInt},
};
use citeledger_ledger::LedgerConfig;

/// New value for a policy knob
#[derive(Debug, Deserialize)]
pub struct PolicyUpdateRequest {
    pub value: WireInt,
}

#[derive(Serialize)]
pub struct PolicyUpdateResponse {
    pub value: u64,
}

/// Current ledger policy
pub async fn get_config(State(state): State<AppState>) -> Json<LedgerConfig> {
    Json(state.ledger.read(|ledger| ledger.config().clone()).await)
}

/// Set the ceiling on live citations per paper
pub async fn set_max_citations(
    State(state): State<AppState>,
    ctx: CallerContext,
    ApiJson(request): ApiJson<PolicyUpdateRequest>,
) -> Result<Json<PolicyUpdateResponse>> {
    let value = request.value.to_ledger();
    execute(&state, &ctx, "set_max_citations_per_paper", |ledger, inv| {
        ledger.set_max_citations_per_paper(inv, value)
    })
    .await?;

    Ok(Json(PolicyUpdateResponse { value }))
}

/// Set the reward base applied to future citations
pub async fn set_reward_base(
    State(state): State<AppState>,
    ctx: CallerContext,
    ApiJson(request): ApiJson<PolicyUpdateRequest>,
) -> Result<Json<PolicyUpdateResponse>> {
    let value = request.value.to_ledger();
    execute(&state, &ctx, "set_citation_reward_base", |ledger, inv| {
        ledger.set_citation_reward_base(inv, value)
    })
    .await?;

    Ok(Json(PolicyUpdateResponse { value }))
}
