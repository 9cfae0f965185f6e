//! Operation dispatch
//!
//! The path a transaction's operation takes through the core: select the
//! matching evaluator, evaluate, apply, then persist a history record and
//! thread it onto every account the operation concerns.
//!
//! Evaluate failures propagate before any mutation, so a rejected
//! operation leaves the database byte-identical.

use crate::context::ChainContext;
use crate::database::Database;
use crate::evaluator::{
    OperationEvaluator, WithdrawPermissionClaimEvaluator, WithdrawPermissionCreateEvaluator,
    WithdrawPermissionDeleteEvaluator, WithdrawPermissionUpdateEvaluator,
};
use crate::history;
use crate::operations::{Operation, OperationResult};
use cadence_core::Result;
use tracing::debug;

pub use crate::history::OperationPosition;

/// Evaluate and apply `op` at `position`, then record it onto the history
/// chain of each relevant account.
///
/// Returns the operation's result. On a validation failure nothing is
/// mutated and no history is written.
pub fn apply_operation(
    db: &mut Database,
    ctx: &ChainContext,
    op: &Operation,
    position: OperationPosition,
) -> Result<OperationResult> {
    let result = match op {
        Operation::WithdrawPermissionCreate(inner) => {
            let evaluator = WithdrawPermissionCreateEvaluator;
            evaluator.evaluate(db, ctx, inner)?;
            let id = evaluator.apply(db, ctx, inner)?;
            OperationResult::object_id(id)
        }
        Operation::WithdrawPermissionClaim(inner) => {
            let evaluator = WithdrawPermissionClaimEvaluator;
            evaluator.evaluate(db, ctx, inner)?;
            evaluator.apply(db, ctx, inner)?;
            OperationResult::Void
        }
        Operation::WithdrawPermissionUpdate(inner) => {
            let evaluator = WithdrawPermissionUpdateEvaluator;
            evaluator.evaluate(db, ctx, inner)?;
            evaluator.apply(db, ctx, inner)?;
            OperationResult::Void
        }
        Operation::WithdrawPermissionDelete(inner) => {
            let evaluator = WithdrawPermissionDeleteEvaluator;
            evaluator.evaluate(db, ctx, inner)?;
            evaluator.apply(db, ctx, inner)?;
            OperationResult::Void
        }
    };

    let record_id = history::record(db, op.clone(), result.clone(), position);
    for account in op.relevant_accounts() {
        history::append_to_account(db, account, record_id)?;
    }
    debug!(
        op = op.name(),
        block = position.block_num,
        record = %record_id,
        "applied operation"
    );
    Ok(result)
}
