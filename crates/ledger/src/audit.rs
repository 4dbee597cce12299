//! Aggregate consistency audit
//!
//! Recomputes every paper's count and reward from the live citation table and
//! compares them with the maintained index.

use crate::ledger::CitationLedger;
use crate::types::{CitationId, PaperAggregate, PaperId};
use std::collections::HashMap;
use thiserror::Error;

/// First inconsistency found by an audit
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error("Paper {paper_id}: recorded count {recorded} but {actual} live citations")]
    CountMismatch {
        paper_id: PaperId,
        recorded: u64,
        actual: u64,
    },

    #[error("Paper {paper_id}: recorded reward {recorded} but live citations sum to {actual}")]
    RewardMismatch {
        paper_id: PaperId,
        recorded: u128,
        actual: u128,
    },

    #[error("Citation {citation_id} is at or beyond the id counter {next_id}")]
    IdBeyondCounter {
        citation_id: CitationId,
        next_id: CitationId,
    },
}

impl CitationLedger {
    /// Verify that the aggregate index mirrors the citation table
    pub fn audit(&self) -> Result<(), AuditError> {
        let next_id = self.table().next_id();
        let mut expected: HashMap<PaperId, PaperAggregate> = HashMap::new();

        for (&citation_id, citation) in self.table().iter() {
            if citation_id >= next_id {
                return Err(AuditError::IdBeyondCounter { citation_id, next_id });
            }
            let entry = expected.entry(citation.cited_id).or_default();
            entry.count += 1;
            entry.total_reward += citation.contribution();
        }

        // Papers in the index but absent from `expected` must be zeroed
        for (&paper_id, recorded) in self.aggregates().papers() {
            let actual = expected.remove(&paper_id).unwrap_or_default();
            compare(paper_id, *recorded, actual)?;
        }

        // Anything left has live citations but no index entry
        for (paper_id, actual) in expected {
            compare(paper_id, PaperAggregate::default(), actual)?;
        }

        Ok(())
    }
}

fn compare(paper_id: PaperId, recorded: PaperAggregate, actual: PaperAggregate) -> Result<(), AuditError> {
    if recorded.count != actual.count {
        return Err(AuditError::CountMismatch {
            paper_id,
            recorded: recorded.count,
            actual: actual.count,
        });
    }
    if recorded.total_reward != actual.total_reward {
        return Err(AuditError::RewardMismatch {
            paper_id,
            recorded: recorded.total_reward,
            actual: actual.total_reward,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Invocation, Principal};

    #[test]
    fn test_empty_ledger_is_consistent() {
        assert_eq!(CitationLedger::new().audit(), Ok(()));
    }

    #[test]
    fn test_consistent_after_operations() {
        let inv = Invocation::new("ST1TEST", 3);
        let mut ledger = CitationLedger::new();
        ledger
            .set_authority_contract(Principal::new("ST2TEST"))
            .unwrap();

        ledger.add_citation(&inv, 1, 2, 50).unwrap();
        ledger.add_citation(&inv, 3, 2, 20).unwrap();
        ledger.set_citation_reward_base(&inv, 250).unwrap();
        ledger.add_citation(&inv, 4, 5, 90).unwrap();
        ledger.remove_citation(&inv, 0).unwrap();

        assert_eq!(ledger.audit(), Ok(()));
    }

    #[test]
    fn test_detects_drift() {
        let inv = Invocation::new("ST1TEST", 0);
        let mut ledger = CitationLedger::new();
        ledger
            .set_authority_contract(Principal::new("ST2TEST"))
            .unwrap();
        ledger.add_citation(&inv, 1, 2, 50).unwrap();

        let mut tampered = ledger.clone();
        tampered.aggregates_mut().put(
            2,
            PaperAggregate {
                count: 1,
                total_reward: 1,
            },
        );
        assert_eq!(
            tampered.audit(),
            Err(AuditError::RewardMismatch {
                paper_id: 2,
                recorded: 1,
                actual: 5000,
            })
        );

        let mut tampered = ledger.clone();
        tampered.aggregates_mut().put(9, PaperAggregate { count: 2, total_reward: 0 });
        assert_eq!(
            tampered.audit(),
            Err(AuditError::CountMismatch {
                paper_id: 9,
                recorded: 2,
                actual: 0,
            })
        );
    }
}
