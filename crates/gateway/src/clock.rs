//! Logical block height tracking
//!
//! The gateway is the invocation environment for the ledger, so it owns the
//! height fed into each call. Heights never go backwards: a caller may pin a
//! height at or above the last committed one, otherwise the last committed
//! height is reused.

use citeledger_ledger::{BlockHeight, LedgerError, LedgerResult};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct HeightClock {
    last: AtomicU64,
}

impl HeightClock {
    pub fn new(start: BlockHeight) -> Self {
        Self {
            last: AtomicU64::new(start),
        }
    }

    /// Last committed height
    pub fn current(&self) -> BlockHeight {
        self.last.load(Ordering::Acquire)
    }

    /// Height to use for a call, given what the caller asserted
    pub fn resolve(&self, asserted: Option<BlockHeight>) -> LedgerResult<BlockHeight> {
        let last = self.current();
        match asserted {
            None => Ok(last),
            Some(height) if height < last => Err(LedgerError::InvalidTimestamp),
            Some(height) => Ok(height),
        }
    }

    /// Record the height of a committed call.
    ///
    /// Must run under the ledger write lock together with `resolve`.
    pub fn commit(&self, height: BlockHeight) {
        self.last.fetch_max(height, Ordering::AcqRel);
    }
}
