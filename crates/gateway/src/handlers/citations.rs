//! Citation handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{handlers::execute, AppState};
use citeledger_common::{
    auth::CallerContext,
    errors::Result,
    extract::{ApiJson, WireInt},
};
use citeledger_ledger::{Citation, CitationId};

/// Add citation request. Negative integers are accepted here and rejected by
/// the ledger (`InvalidPaperId`, `InvalidWeight`).
#[derive(Debug, Deserialize)]
pub struct AddCitationRequest {
    pub citer_id: WireInt,
    pub cited_id: WireInt,
    pub weight: WireInt,
}

#[derive(Serialize)]
pub struct AddCitationResponse {
    pub citation_id: CitationId,
}

#[derive(Serialize)]
pub struct RemoveCitationResponse {
    pub citation_id: CitationId,
    pub removed: bool,
}

#[derive(Serialize)]
pub struct TotalCitationsResponse {
    /// Citations ever created (the id counter)
    pub total_citations: u64,
    /// Citations currently live
    pub live_citations: usize,
}

/// Record a citation on behalf of the caller
pub async fn add_citation(
    State(state): State<AppState>,
    ctx: CallerContext,
    ApiJson(request): ApiJson<AddCitationRequest>,
) -> Result<(StatusCode, Json<AddCitationResponse>)> {
    let citation_id = execute(&state, &ctx, "add_citation", |ledger, inv| {
        ledger.add_citation(
            inv,
            request.citer_id.to_ledger(),
            request.cited_id.to_ledger(),
            request.weight.to_ledger(),
        )
    })
    .await?;

    Ok((StatusCode::CREATED, Json(AddCitationResponse { citation_id })))
}

/// Remove a citation recorded by the caller
pub async fn remove_citation(
    State(state): State<AppState>,
    ctx: CallerContext,
    Path(citation_id): Path<CitationId>,
) -> Result<Json<RemoveCitationResponse>> {
    execute(&state, &ctx, "remove_citation", |ledger, inv| {
        ledger.remove_citation(inv, citation_id)
    })
    .await?;

    Ok(Json(RemoveCitationResponse {
        citation_id,
        removed: true,
    }))
}

/// Get a citation; `null` when no live record has this id
pub async fn get_citation(
    State(state): State<AppState>,
    Path(citation_id): Path<CitationId>,
) -> Json<Option<Citation>> {
    Json(
        state
            .ledger
            .read(|ledger| ledger.get_citation(citation_id).cloned())
            .await,
    )
}

/// Citation counters
pub async fn total_citations(State(state): State<AppState>) -> Json<TotalCitationsResponse> {
    let (total_citations, live_citations) = state
        .ledger
        .read(|ledger| (ledger.get_total_citations(), ledger.live_citations()))
        .await;

    Json(TotalCitationsResponse {
        total_citations,
        live_citations,
    })
}
