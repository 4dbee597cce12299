//! Per-paper aggregate index
//!
//! Count and reward totals keyed by cited paper id, kept in lockstep with
//! the citation table. Entries are created on first citation and never
//! deleted; a paper whose citations were all removed keeps a zeroed entry.

use crate::types::{PaperAggregate, PaperId};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct AggregateIndex {
    papers: HashMap<PaperId, PaperAggregate>,
}

impl AggregateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate for a paper, zeroed if it was never cited
    pub fn get(&self, paper_id: PaperId) -> PaperAggregate {
        self.papers.get(&paper_id).copied().unwrap_or_default()
    }

    pub fn count(&self, paper_id: PaperId) -> u64 {
        self.get(paper_id).count
    }

    pub fn total_reward(&self, paper_id: PaperId) -> u128 {
        self.get(paper_id).total_reward
    }

    /// Aggregate after one more citation worth `contribution`, or `None` on overflow.
    /// Nothing is written; pair with [`AggregateIndex::put`].
    pub fn credited(&self, paper_id: PaperId, contribution: u128) -> Option<PaperAggregate> {
        let current = self.get(paper_id);
        Some(PaperAggregate {
            count: current.count.checked_add(1)?,
            total_reward: current.total_reward.checked_add(contribution)?,
        })
    }

    pub fn put(&mut self, paper_id: PaperId, aggregate: PaperAggregate) {
        self.papers.insert(paper_id, aggregate);
    }

    /// Take one citation worth `contribution` off a paper
    pub fn debit(&mut self, paper_id: PaperId, contribution: u128) {
        let entry = self.papers.entry(paper_id).or_default();
        debug_assert!(entry.count > 0 && entry.total_reward >= contribution);
        entry.count = entry.count.saturating_sub(1);
        entry.total_reward = entry.total_reward.saturating_sub(contribution);
    }

    /// Papers that have ever been cited
    pub fn papers(&self) -> impl Iterator<Item = (&PaperId, &PaperAggregate)> {
        self.papers.iter()
    }
}
