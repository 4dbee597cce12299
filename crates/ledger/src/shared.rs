//! Shared ledger handle
//!
//! Serializes every mutation behind a single write lock so concurrent callers
//! observe a total order of operations. Reads share the lock and always see
//! the latest committed state.

use crate::ledger::CitationLedger;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cloneable handle to one ledger instance
#[derive(Clone, Default)]
pub struct SharedLedger {
    inner: Arc<RwLock<CitationLedger>>,
}

impl SharedLedger {
    pub fn new(ledger: CitationLedger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    /// Run a validate-then-mutate sequence under the write lock
    pub async fn transact<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&mut CitationLedger) -> T,
    {
        let mut guard = self.inner.write().await;
        f(&mut guard)
    }

    /// Run a query against the latest committed state
    pub async fn read<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&CitationLedger) -> T,
    {
        let guard = self.inner.read().await;
        f(&guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Invocation, Principal};

    async fn bootstrap() -> SharedLedger {
        let shared = SharedLedger::default();
        shared
            .transact(|ledger| {
                ledger.set_authority_contract(Principal::new("ST2TEST"))
            })
            .await
            .unwrap();
        shared
    }

    #[tokio::test]
    async fn test_transact_and_read() {
        let shared = bootstrap().await;
        let id = shared
            .transact(|ledger| ledger.add_citation(&Invocation::new("ST1TEST", 1), 1, 2, 50))
            .await
            .unwrap();
        assert_eq!(id, 0);

        let count = shared.read(|ledger| ledger.get_citation_count(2)).await;
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_concurrent_adds_get_distinct_ids() {
        let shared = bootstrap().await;

        let mut handles = Vec::new();
        for i in 0..32u64 {
            let shared = shared.clone();
            handles.push(tokio::spawn(async move {
                let caller = format!("ST{}", i);
                shared
                    .transact(|ledger| {
                        ledger.add_citation(&Invocation::new(caller, i), i + 10, 2, 1)
                    })
                    .await
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, (0..32).collect::<Vec<_>>());

        shared
            .read(|ledger| {
                assert_eq!(ledger.get_citation_count(2), 32);
                assert_eq!(ledger.get_citation_reward(2), 32 * 100);
                assert!(ledger.audit().is_ok());
            })
            .await;
    }
}
