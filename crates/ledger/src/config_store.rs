//! Configuration store
//!
//! Holds the authority principal and the two policy knobs. The authority is
//! bound once and never changes afterwards.

use crate::error::{LedgerError, LedgerResult};
use crate::types::{Invocation, Principal};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Default ceiling on live citations per paper
pub const DEFAULT_MAX_CITATIONS_PER_PAPER: u64 = 1000;

/// Default reward multiplier
pub const DEFAULT_CITATION_REWARD_BASE: u64 = 100;

/// Ledger policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Principal allowed to change policy; unset until bound
    pub authority: Option<Principal>,

    /// Ceiling on live citations per cited paper
    pub max_citations_per_paper: u64,

    /// Multiplier applied to the weight of future citations
    pub citation_reward_base: u64,

    /// Require the caller to be the authority for policy changes
    #[serde(default)]
    pub restrict_policy_to_authority: bool,
}

impl LedgerConfig {
    /// Check the same rules the setters enforce
    pub fn validate(&self) -> LedgerResult<()> {
        if self.authority.as_ref().is_some_and(Principal::is_burn) {
            return Err(LedgerError::NotAuthorized);
        }
        if self.max_citations_per_paper == 0 {
            return Err(LedgerError::InvalidWeight);
        }
        if self.citation_reward_base == 0 {
            return Err(LedgerError::InvalidReward);
        }
        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            authority: None,
            max_citations_per_paper: DEFAULT_MAX_CITATIONS_PER_PAPER,
            citation_reward_base: DEFAULT_CITATION_REWARD_BASE,
            restrict_policy_to_authority: false,
        }
    }
}

/// Owned configuration state of a ledger
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    config: LedgerConfig,
}

impl ConfigStore {
    /// Store for a starting policy, rejected if any value breaks the setter rules
    pub fn new(config: LedgerConfig) -> LedgerResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn authority(&self) -> Option<&Principal> {
        self.config.authority.as_ref()
    }

    pub fn max_citations_per_paper(&self) -> u64 {
        self.config.max_citations_per_paper
    }

    pub fn reward_base(&self) -> u64 {
        self.config.citation_reward_base
    }

    /// Fail unless an authority has been bound
    pub fn require_authority(&self) -> LedgerResult<&Principal> {
        self.config
            .authority
            .as_ref()
            .ok_or(LedgerError::AuthorityNotVerified)
    }

    /// Bind the authority. Only succeeds once.
    pub fn set_authority(&mut self, principal: Principal) -> LedgerResult<()> {
        if principal.is_burn() {
            return Err(LedgerError::NotAuthorized);
        }
        if self.config.authority.is_some() {
            return Err(LedgerError::AuthorityAlreadySet);
        }

        info!(authority = %principal, "Authority bound");
        self.config.authority = Some(principal);
        Ok(())
    }

    pub fn set_max_citations_per_paper(&mut self, inv: &Invocation, max: u64) -> LedgerResult<()> {
        if max == 0 {
            return Err(LedgerError::InvalidWeight);
        }
        self.check_policy_caller(inv)?;

        info!(
            caller = %inv.caller,
            previous = self.config.max_citations_per_paper,
            max,
            "Citation limit updated"
        );
        self.config.max_citations_per_paper = max;
        Ok(())
    }

    pub fn set_reward_base(&mut self, inv: &Invocation, base: u64) -> LedgerResult<()> {
        if base == 0 {
            return Err(LedgerError::InvalidReward);
        }
        self.check_policy_caller(inv)?;

        info!(
            caller = %inv.caller,
            previous = self.config.citation_reward_base,
            base,
            "Citation reward base updated"
        );
        self.config.citation_reward_base = base;
        Ok(())
    }

    fn check_policy_caller(&self, inv: &Invocation) -> LedgerResult<()> {
        let authority = self.require_authority()?;
        if self.config.restrict_policy_to_authority && *authority != inv.caller {
            return Err(LedgerError::NotAuthorized);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound_store() -> ConfigStore {
        let mut store = ConfigStore::default();
        store.set_authority(Principal::new("ST2TEST")).unwrap();
        store
    }

    #[test]
    fn test_defaults() {
        let store = ConfigStore::default();
        assert_eq!(store.max_citations_per_paper(), 1000);
        assert_eq!(store.reward_base(), 100);
        assert!(store.authority().is_none());
    }

    #[test]
    fn test_authority_set_once() {
        let mut store = bound_store();
        assert_eq!(
            store.set_authority(Principal::new("ST3OTHER")),
            Err(LedgerError::AuthorityAlreadySet)
        );
        assert_eq!(store.authority(), Some(&Principal::new("ST2TEST")));
    }

    #[test]
    fn test_burn_identity_rejected() {
        let mut store = ConfigStore::default();
        assert_eq!(
            store.set_authority(Principal::burn()),
            Err(LedgerError::NotAuthorized)
        );
        assert!(store.authority().is_none());
    }

    #[test]
    fn test_burn_checked_before_already_set() {
        let mut store = bound_store();
        assert_eq!(
            store.set_authority(Principal::burn()),
            Err(LedgerError::NotAuthorized)
        );
    }

    #[test]
    fn test_range_checked_before_authority() {
        let mut store = ConfigStore::default();
        let inv = Invocation::new("ST1TEST", 0);
        assert_eq!(
            store.set_max_citations_per_paper(&inv, 0),
            Err(LedgerError::InvalidWeight)
        );
        assert_eq!(store.set_reward_base(&inv, 0), Err(LedgerError::InvalidReward));
        assert_eq!(
            store.set_max_citations_per_paper(&inv, 5),
            Err(LedgerError::AuthorityNotVerified)
        );
        assert_eq!(
            store.set_reward_base(&inv, 5),
            Err(LedgerError::AuthorityNotVerified)
        );
    }

    #[test]
    fn test_any_caller_may_update_policy_by_default() {
        let mut store = bound_store();
        let inv = Invocation::new("ST1TEST", 0);
        store.set_max_citations_per_paper(&inv, 5).unwrap();
        store.set_reward_base(&inv, 200).unwrap();
        assert_eq!(store.max_citations_per_paper(), 5);
        assert_eq!(store.reward_base(), 200);
    }

    #[test]
    fn test_starting_policy_validated() {
        assert!(ConfigStore::new(LedgerConfig::default()).is_ok());
        assert_eq!(
            ConfigStore::new(LedgerConfig {
                authority: Some(Principal::burn()),
                ..LedgerConfig::default()
            })
            .unwrap_err(),
            LedgerError::NotAuthorized
        );
        assert_eq!(
            ConfigStore::new(LedgerConfig {
                max_citations_per_paper: 0,
                ..LedgerConfig::default()
            })
            .unwrap_err(),
            LedgerError::InvalidWeight
        );
        assert_eq!(
            ConfigStore::new(LedgerConfig {
                citation_reward_base: 0,
                ..LedgerConfig::default()
            })
            .unwrap_err(),
            LedgerError::InvalidReward
        );
    }

    #[test]
    fn test_restricted_policy_requires_authority_caller() {
        let mut store = ConfigStore::new(LedgerConfig {
            restrict_policy_to_authority: true,
            ..LedgerConfig::default()
        })
        .unwrap();
        store.set_authority(Principal::new("ST2TEST")).unwrap();

        let stranger = Invocation::new("ST1TEST", 0);
        assert_eq!(
            store.set_reward_base(&stranger, 200),
            Err(LedgerError::NotAuthorized)
        );
        assert_eq!(store.reward_base(), 100);

        let authority = Invocation::new("ST2TEST", 0);
        store.set_reward_base(&authority, 200).unwrap();
        assert_eq!(store.reward_base(), 200);
    }
}
