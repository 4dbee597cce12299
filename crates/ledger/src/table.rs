//! Citation table
//!
//! The authoritative set of live citations keyed by sequential id. Ids come
//! from a monotonic counter and are never handed out twice, even after the
//! record they named has been removed.

use crate::types::{Citation, CitationId};
use std::collections::BTreeMap;

/// Live citations plus the id counter
#[derive(Debug, Clone, Default)]
pub struct CitationTable {
    /// Live records ordered by id
    records: BTreeMap<CitationId, Citation>,

    /// Next id to assign; equals the number of citations ever created
    next_id: CitationId,
}

impl CitationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next insert will receive
    pub fn next_id(&self) -> CitationId {
        self.next_id
    }

    pub fn contains(&self, id: CitationId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn get(&self, id: CitationId) -> Option<&Citation> {
        self.records.get(&id)
    }

    /// Store a citation under the next id and advance the counter.
    ///
    /// Callers check `contains(next_id())` beforehand; the slot is always
    /// free while the counter only moves forward.
    pub fn push(&mut self, citation: Citation) -> CitationId {
        let id = self.next_id;
        debug_assert!(!self.records.contains_key(&id));
        self.records.insert(id, citation);
        self.next_id += 1;
        id
    }

    /// Delete a record. Its id stays retired.
    pub fn remove(&mut self, id: CitationId) -> Option<Citation> {
        self.records.remove(&id)
    }

    /// Number of live citations
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of citations ever created
    pub fn total_created(&self) -> u64 {
        self.next_id
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CitationId, &Citation)> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Principal;

    fn citation(citer_id: u64, cited_id: u64) -> Citation {
        Citation {
            citer_id,
            cited_id,
            weight: 10,
            timestamp: 0,
            citer_principal: Principal::new("ST1TEST"),
            reward_base: 100,
        }
    }

    #[test]
    fn test_sequential_ids() {
        let mut table = CitationTable::new();
        assert_eq!(table.push(citation(1, 2)), 0);
        assert_eq!(table.push(citation(3, 2)), 1);
        assert_eq!(table.next_id(), 2);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut table = CitationTable::new();
        let id = table.push(citation(1, 2));
        assert!(table.remove(id).is_some());
        assert!(table.is_empty());
        assert!(!table.contains(id));

        assert_eq!(table.push(citation(1, 2)), 1);
        assert_eq!(table.total_created(), 2);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_missing() {
        let mut table = CitationTable::new();
        assert!(table.remove(7).is_none());
        assert_eq!(table.total_created(), 0);
    }
}
