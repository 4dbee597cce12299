//! Core ledger types
//!
//! Identifiers, caller identity, the invocation environment and the two
//! record kinds the ledger keeps: citations and per-paper aggregates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Paper identifier. Valid papers are strictly positive.
pub type PaperId = u64;

/// Sequentially assigned citation identifier, starting at 0.
pub type CitationId = u64;

/// Logical block height supplied by the host.
pub type BlockHeight = u64;

/// Relative citation strength, valid in `1..=MAX_CITATION_WEIGHT`.
pub type Weight = u64;

/// Upper bound (inclusive) for a citation weight
pub const MAX_CITATION_WEIGHT: Weight = 100;

/// The designated burn identity that can never hold authority
pub const BURN_PRINCIPAL: &str = "SP000000000000000000002Q6VF78";

/// Opaque caller identity, compared for equality only
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The burn/null identity
    pub fn burn() -> Self {
        Self(BURN_PRINCIPAL.to_string())
    }

    pub fn is_burn(&self) -> bool {
        self.0 == BURN_PRINCIPAL
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Principal {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Facts the host supplies with every mutating call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Identity of the current caller
    pub caller: Principal,

    /// Current logical block height
    pub height: BlockHeight,
}

impl Invocation {
    pub fn new(caller: impl Into<Principal>, height: BlockHeight) -> Self {
        Self {
            caller: caller.into(),
            height,
        }
    }
}

/// A recorded citation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Paper that contains the citation
    pub citer_id: PaperId,

    /// Paper being cited
    pub cited_id: PaperId,

    /// Relative strength (1..=100)
    pub weight: Weight,

    /// Block height at creation
    pub timestamp: BlockHeight,

    /// Caller that recorded the citation; the only identity allowed to remove it
    pub citer_principal: Principal,

    /// Reward base in effect when the citation was added
    pub reward_base: u64,
}

impl Citation {
    /// Reward this citation contributes to the cited paper
    pub fn contribution(&self) -> u128 {
        u128::from(self.weight) * u128::from(self.reward_base)
    }
}

/// Per-paper totals over the live citations targeting it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperAggregate {
    /// Number of live citations
    pub count: u64,

    /// Sum of the live citations' contributions
    pub total_reward: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burn_principal() {
        assert!(Principal::burn().is_burn());
        assert!(!Principal::new("ST1TEST").is_burn());
    }

    #[test]
    fn test_contribution_uses_stored_base() {
        let citation = Citation {
            citer_id: 1,
            cited_id: 2,
            weight: 50,
            timestamp: 0,
            citer_principal: Principal::new("ST1TEST"),
            reward_base: 200,
        };
        assert_eq!(citation.contribution(), 10_000);
    }

    #[test]
    fn test_contribution_does_not_overflow() {
        let citation = Citation {
            citer_id: 1,
            cited_id: 2,
            weight: MAX_CITATION_WEIGHT,
            timestamp: 0,
            citer_principal: Principal::new("ST1TEST"),
            reward_base: u64::MAX,
        };
        assert_eq!(citation.contribution(), 100 * u128::from(u64::MAX));
    }

    #[test]
    fn test_principal_serializes_as_string() {
        let json = serde_json::to_string(&Principal::new("ST1TEST")).unwrap();
        assert_eq!(json, "\"ST1TEST\"");
    }
}
