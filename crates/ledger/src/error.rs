//! Ledger error taxonomy
//!
//! Every mutating operation either commits fully or fails with exactly one
//! of these kinds, leaving the ledger untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using LedgerError
pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Business rule violations reported by the ledger
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerError {
    #[error("Caller is not authorized for this operation")]
    NotAuthorized,

    #[error("Paper ids must be positive")]
    InvalidPaperId,

    #[error("Citation id is already occupied")]
    CitationAlreadyExists,

    #[error("Value out of range")]
    InvalidWeight,

    #[error("Block height went backwards")]
    InvalidTimestamp,

    #[error("No authority has been configured")]
    AuthorityNotVerified,

    #[error("Paper has reached its citation limit")]
    CitationLimitExceeded,

    #[error("A paper cannot cite itself")]
    SelfCitation,

    #[error("Invalid reward value")]
    InvalidReward,

    #[error("Authority is already configured")]
    AuthorityAlreadySet,

    #[error("Citation not found")]
    CitationNotFound,
}

impl LedgerError {
    /// Stable numeric code for this error
    pub fn code(&self) -> u32 {
        match self {
            LedgerError::NotAuthorized => 100,
            LedgerError::InvalidPaperId => 101,
            LedgerError::CitationAlreadyExists => 103,
            LedgerError::InvalidWeight => 104,
            LedgerError::InvalidTimestamp => 105,
            LedgerError::AuthorityNotVerified => 106,
            LedgerError::CitationLimitExceeded => 108,
            LedgerError::SelfCitation => 110,
            LedgerError::InvalidReward => 111,
            LedgerError::AuthorityAlreadySet => 112,
            LedgerError::CitationNotFound => 113,
        }
    }

    /// Whether the error comes from malformed input rather than ledger state
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidPaperId
                | LedgerError::InvalidWeight
                | LedgerError::InvalidTimestamp
                | LedgerError::SelfCitation
                | LedgerError::InvalidReward
        )
    }

    /// Short label used for logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            LedgerError::NotAuthorized => "not_authorized",
            LedgerError::InvalidPaperId => "invalid_paper_id",
            LedgerError::CitationAlreadyExists => "citation_already_exists",
            LedgerError::InvalidWeight => "invalid_weight",
            LedgerError::InvalidTimestamp => "invalid_timestamp",
            LedgerError::AuthorityNotVerified => "authority_not_verified",
            LedgerError::CitationLimitExceeded => "citation_limit_exceeded",
            LedgerError::SelfCitation => "self_citation",
            LedgerError::InvalidReward => "invalid_reward",
            LedgerError::AuthorityAlreadySet => "authority_already_set",
            LedgerError::CitationNotFound => "citation_not_found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL: [LedgerError; 11] = [
        LedgerError::NotAuthorized,
        LedgerError::InvalidPaperId,
        LedgerError::CitationAlreadyExists,
        LedgerError::InvalidWeight,
        LedgerError::InvalidTimestamp,
        LedgerError::AuthorityNotVerified,
        LedgerError::CitationLimitExceeded,
        LedgerError::SelfCitation,
        LedgerError::InvalidReward,
        LedgerError::AuthorityAlreadySet,
        LedgerError::CitationNotFound,
    ];

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<u32> = ALL.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), ALL.len());
    }

    #[test]
    fn test_not_found_differs_from_already_exists() {
        assert_ne!(
            LedgerError::CitationNotFound.code(),
            LedgerError::CitationAlreadyExists.code()
        );
    }

    #[test]
    fn test_input_errors() {
        assert!(LedgerError::SelfCitation.is_input_error());
        assert!(!LedgerError::NotAuthorized.is_input_error());
        assert!(!LedgerError::CitationLimitExceeded.is_input_error());
    }

    #[test]
    fn test_serialized_name() {
        let json = serde_json::to_string(&LedgerError::AuthorityNotVerified).unwrap();
        assert_eq!(json, "\"AUTHORITY_NOT_VERIFIED\"");
    }
}
