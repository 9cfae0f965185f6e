//! Operation evaluators
//!
//! Every state transition is split into a pure **evaluate** phase and a
//! mutating **apply** phase. The separation is a hard consensus-safety
//! invariant: evaluate is idempotent and side-effect-free, so speculative
//! or re-validation passes can never corrupt state, and apply is invoked
//! only with an operation that just passed evaluate against the same
//! database state.

mod withdraw_permission;

pub use withdraw_permission::{
    WithdrawPermissionClaimEvaluator, WithdrawPermissionCreateEvaluator,
    WithdrawPermissionDeleteEvaluator, WithdrawPermissionUpdateEvaluator,
};

use crate::context::ChainContext;
use crate::database::Database;
use cadence_core::Result;

/// An evaluate/apply pair for one operation kind.
///
/// `evaluate` takes the database by shared reference and must not mutate
/// anything; a failure is a recoverable validation error. `apply` assumes
/// a prior successful evaluate against the same state — if it fails
/// anyway, that is an internal invariant violation and the enclosing
/// transaction must be rejected wholesale.
pub trait OperationEvaluator {
    /// The operation payload this evaluator handles
    type Operation;
    /// Value produced by a successful apply
    type Output;

    /// Validate `op` against current state without mutating it
    fn evaluate(&self, db: &Database, ctx: &ChainContext, op: &Self::Operation) -> Result<()>;

    /// Apply a pre-validated `op`, mutating state
    fn apply(&self, db: &mut Database, ctx: &ChainContext, op: &Self::Operation)
        -> Result<Self::Output>;
}
