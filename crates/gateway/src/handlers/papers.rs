//! Per-paper aggregate handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::AppState;
use citeledger_ledger::PaperId;

#[derive(Serialize)]
pub struct CitationCountResponse {
    pub paper_id: PaperId,
    pub count: u64,
}

#[derive(Serialize)]
pub struct CitationRewardResponse {
    pub paper_id: PaperId,
    pub total_reward: u128,
}

/// Live citation count for a paper (0 when never cited)
pub async fn citation_count(
    State(state): State<AppState>,
    Path(paper_id): Path<PaperId>,
) -> Json<CitationCountResponse> {
    let count = state
        .ledger
        .read(|ledger| ledger.get_citation_count(paper_id))
        .await;

    Json(CitationCountResponse { paper_id, count })
}

/// Accumulated reward for a paper (0 when never cited)
pub async fn citation_reward(
    State(state): State<AppState>,
    Path(paper_id): Path<PaperId>,
) -> Json<CitationRewardResponse> {
    let total_reward = state
        .ledger
        .read(|ledger| ledger.get_citation_reward(paper_id))
        .await;

    Json(CitationRewardResponse {
        paper_id,
        total_reward,
    })
}
