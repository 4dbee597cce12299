//! Ledger facade
//!
//! The public operation surface. Every mutating operation validates against
//! the configuration store and aggregate index first, then applies its
//! paired table/aggregate mutation. A failed call leaves all state as it was.

use crate::aggregate::AggregateIndex;
use crate::config_store::{ConfigStore, LedgerConfig};
use crate::error::{LedgerError, LedgerResult};
use crate::table::CitationTable;
use crate::types::{
    Citation, CitationId, Invocation, PaperId, Principal, Weight, MAX_CITATION_WEIGHT,
};
use tracing::debug;

/// Citation ledger state machine
#[derive(Debug, Clone, Default)]
pub struct CitationLedger {
    config: ConfigStore,
    citations: CitationTable,
    aggregates: AggregateIndex,
}

impl CitationLedger {
    /// Create a ledger with default policy and no authority
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger with the given starting policy.
    ///
    /// Fails with the error the matching setter would report: `NotAuthorized`
    /// for a burn authority, `InvalidWeight` for a zero limit, `InvalidReward`
    /// for a zero reward base.
    pub fn with_config(config: LedgerConfig) -> LedgerResult<Self> {
        Ok(Self {
            config: ConfigStore::new(config)?,
            ..Self::default()
        })
    }

    // ---------------------------------------------------------------------
    // Configuration
    // ---------------------------------------------------------------------

    /// Bind the authority principal. One-shot; the burn identity is refused.
    pub fn set_authority_contract(&mut self, principal: Principal) -> LedgerResult<()> {
        self.config.set_authority(principal)
    }

    pub fn set_max_citations_per_paper(&mut self, inv: &Invocation, max: u64) -> LedgerResult<()> {
        self.config.set_max_citations_per_paper(inv, max)
    }

    /// Change the reward base. Applies to citations added afterwards only.
    pub fn set_citation_reward_base(&mut self, inv: &Invocation, base: u64) -> LedgerResult<()> {
        self.config.set_reward_base(inv, base)
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Record that `citer_id` cites `cited_id`. Returns the assigned id.
    pub fn add_citation(
        &mut self,
        inv: &Invocation,
        citer_id: PaperId,
        cited_id: PaperId,
        weight: Weight,
    ) -> LedgerResult<CitationId> {
        let result = self.try_add_citation(inv, citer_id, cited_id, weight);
        match &result {
            Ok(id) => debug!(
                citation_id = id,
                citer_id,
                cited_id,
                weight,
                caller = %inv.caller,
                height = inv.height,
                "Citation added"
            ),
            Err(e) => debug!(citer_id, cited_id, weight, error = %e, "Citation rejected"),
        }
        result
    }

    fn try_add_citation(
        &mut self,
        inv: &Invocation,
        citer_id: PaperId,
        cited_id: PaperId,
        weight: Weight,
    ) -> LedgerResult<CitationId> {
        self.config.require_authority()?;

        if citer_id == 0 || cited_id == 0 {
            return Err(LedgerError::InvalidPaperId);
        }
        if citer_id == cited_id {
            return Err(LedgerError::SelfCitation);
        }
        if weight == 0 || weight > MAX_CITATION_WEIGHT {
            return Err(LedgerError::InvalidWeight);
        }
        if self.aggregates.count(cited_id) >= self.config.max_citations_per_paper() {
            return Err(LedgerError::CitationLimitExceeded);
        }
        // Unreachable while the counter only moves forward
        if self.citations.contains(self.citations.next_id()) {
            return Err(LedgerError::CitationAlreadyExists);
        }

        let citation = Citation {
            citer_id,
            cited_id,
            weight,
            timestamp: inv.height,
            citer_principal: inv.caller.clone(),
            reward_base: self.config.reward_base(),
        };
        let aggregate = self
            .aggregates
            .credited(cited_id, citation.contribution())
            .ok_or(LedgerError::InvalidReward)?;

        // All checks passed; commit both structures
        self.aggregates.put(cited_id, aggregate);
        Ok(self.citations.push(citation))
    }

    /// Remove a citation. Only the principal that recorded it may do so.
    pub fn remove_citation(&mut self, inv: &Invocation, citation_id: CitationId) -> LedgerResult<()> {
        let citation = self
            .citations
            .get(citation_id)
            .ok_or(LedgerError::CitationNotFound)?;

        if citation.citer_principal != inv.caller {
            debug!(
                citation_id,
                caller = %inv.caller,
                owner = %citation.citer_principal,
                "Removal rejected"
            );
            return Err(LedgerError::NotAuthorized);
        }

        let cited_id = citation.cited_id;
        let contribution = citation.contribution();

        self.aggregates.debit(cited_id, contribution);
        self.citations.remove(citation_id);

        debug!(citation_id, cited_id, caller = %inv.caller, "Citation removed");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn get_citation(&self, citation_id: CitationId) -> Option<&Citation> {
        self.citations.get(citation_id)
    }

    /// Live citation count for a paper (0 if never cited)
    pub fn get_citation_count(&self, paper_id: PaperId) -> u64 {
        self.aggregates.count(paper_id)
    }

    /// Accumulated reward for a paper (0 if never cited)
    pub fn get_citation_reward(&self, paper_id: PaperId) -> u128 {
        self.aggregates.total_reward(paper_id)
    }

    /// Number of citations ever created, including removed ones
    pub fn get_total_citations(&self) -> u64 {
        self.citations.total_created()
    }

    /// Number of currently live citations
    pub fn live_citations(&self) -> usize {
        self.citations.len()
    }

    pub fn config(&self) -> &LedgerConfig {
        self.config.config()
    }

    pub(crate) fn table(&self) -> &CitationTable {
        &self.citations
    }

    pub(crate) fn aggregates(&self) -> &AggregateIndex {
        &self.aggregates
    }

    #[cfg(test)]
    pub(crate) fn aggregates_mut(&mut self) -> &mut AggregateIndex {
        &mut self.aggregates
    }
}
