//! CiteLedger Core
//!
//! A permissioned citation ledger modelled as a pure state machine:
//! - Citation table keyed by sequential, never-reused ids
//! - Per-paper aggregates (count, accumulated reward) kept in lockstep
//! - Authority-gated policy (citation limit, reward base)
//! - All-or-nothing operations with a closed error taxonomy
//!
//! Caller identity and block height are explicit inputs of every mutating
//! call; storage and transport belong to the host.

pub mod aggregate;
pub mod audit;
pub mod config_store;
pub mod error;
pub mod ledger;
pub mod shared;
pub mod table;
pub mod types;

// Re-export commonly used types
pub use audit::AuditError;
pub use config_store::{LedgerConfig, DEFAULT_CITATION_REWARD_BASE, DEFAULT_MAX_CITATIONS_PER_PAPER};
pub use error::{LedgerError, LedgerResult};
pub use ledger::CitationLedger;
pub use shared::SharedLedger;
pub use types::{
    BlockHeight, Citation, CitationId, Invocation, PaperAggregate, PaperId, Principal, Weight,
    BURN_PRINCIPAL, MAX_CITATION_WEIGHT,
};
