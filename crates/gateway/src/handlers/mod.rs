//! API handlers module

pub mod authority;
pub mod citations;
pub mod health;
pub mod papers;
pub mod policy;

use crate::AppState;
use citeledger_common::{
    auth::CallerContext,
    errors::Result,
    metrics::{record_ledger_size, OperationMetrics},
};
use citeledger_ledger::{CitationLedger, Invocation, LedgerResult};

/// Run one mutating ledger operation on behalf of a caller.
///
/// Height resolution, the operation itself and the height commit all happen
/// under the ledger write lock, so committed citations carry non-decreasing
/// timestamps in commit order.
pub(crate) async fn execute<T, F>(
    state: &AppState,
    ctx: &CallerContext,
    operation: &'static str,
    f: F,
) -> Result<T>
where
    F: FnOnce(&mut CitationLedger, &Invocation) -> LedgerResult<T>,
{
    let metrics = OperationMetrics::start(operation);
    let clock = &state.clock;

    let (result, live, created) = state
        .ledger
        .transact(|ledger| {
            let result = clock.resolve(ctx.height).and_then(|height| {
                let inv = Invocation {
                    caller: ctx.caller.clone(),
                    height,
                };
                let value = f(ledger, &inv)?;
                clock.commit(height);
                Ok(value)
            });
            (result, ledger.live_citations(), ledger.get_total_citations())
        })
        .await;

    match &result {
        Ok(_) => {
            metrics.finish("ok");
            record_ledger_size(live, created);
        }
        Err(e) => {
            tracing::debug!(
                operation,
                caller = %ctx.caller,
                request_id = %ctx.request_id,
                error = %e,
                "Ledger operation rejected"
            );
            metrics.finish(e.label());
        }
    }

    Ok(result?)
}
