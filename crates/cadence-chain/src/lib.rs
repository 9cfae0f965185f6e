//! # Cadence Chain - State-Transition Core
//!
//! The consensus-critical pieces of the ledger's state-transition layer:
//!
//! - **Withdraw permissions**: a recurring-withdrawal state machine. One
//!   account pre-authorizes another to pull funds up to a capped amount
//!   per period; four evaluate/apply pairs (create, claim, update,
//!   delete) validate and apply the transitions.
//! - **Operation history**: every applied operation, real or virtual, is
//!   persisted as a write-once record and threaded onto each affected
//!   account's reverse-chronological history chain.
//!
//! Every node must compute identical results from identical inputs.
//! Evaluate phases are pure and side-effect-free; apply phases run only
//! after a successful evaluate and must not fail under normal operation.
//! Operations are applied strictly sequentially in block order.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod context;
pub mod database;
pub mod dispatch;
pub mod evaluator;
pub mod history;
pub mod object;
pub mod operations;

pub use context::ChainContext;
pub use database::Database;
pub use dispatch::{apply_operation, OperationPosition};
pub use evaluator::{
    OperationEvaluator, WithdrawPermissionClaimEvaluator, WithdrawPermissionCreateEvaluator,
    WithdrawPermissionDeleteEvaluator, WithdrawPermissionUpdateEvaluator,
};
pub use history::{append_to_account, history, record, AccountHistoryNode, OperationHistory};
pub use object::{Account, Asset, WithdrawPermission};
pub use operations::{
    Operation, OperationResult, WithdrawPermissionClaim, WithdrawPermissionCreate,
    WithdrawPermissionDelete, WithdrawPermissionUpdate,
};

// Foundation re-exports so consumers rarely need cadence-core directly
pub use cadence_core::{
    AccountHistoryNodeId, AccountId, AssetAmount, AssetId, ChainParameters, ChainTime, Error,
    ObjectId, OperationHistoryId, Result, WithdrawPermissionId,
};
