//! Operation history and per-account history chains
//!
//! Every applied operation, real or virtual, becomes an
//! [`OperationHistory`] record kept on disk as a stack: write-once,
//! never modified, addressed by its sequence number.
//!
//! Account history is a reverse-chronological singly linked list of
//! [`AccountHistoryNode`] rows. Each account points at its most recent
//! node; appending allocates a new node whose `next` is the previous
//! anchor. Links are ids rather than pointers, so the chain can live on
//! append-optimized storage and be traversed with one record lookup per
//! step, newest to oldest, without a secondary index.

use crate::database::Database;
use crate::operations::{Operation, OperationResult};
use cadence_core::{AccountHistoryNodeId, AccountId, OperationHistoryId, Result};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Chain position of an applied operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OperationPosition {
    /// The block that caused this operation
    pub block_num: u32,
    /// The transaction within the block
    pub trx_in_block: u16,
    /// The operation within the transaction
    pub op_in_trx: u16,
    /// Index among virtual operations implied by the operation in block
    pub virtual_op: u16,
}

/// One applied operation with its result and chain position.
///
/// Read-only once created; no code path modifies a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationHistory {
    /// The operation payload
    pub op: Operation,
    /// The operation's execution result
    pub result: OperationResult,
    /// The block that caused this operation
    pub block_num: u32,
    /// The transaction within the block
    pub trx_in_block: u16,
    /// The operation within the transaction
    pub op_in_trx: u16,
    /// Index among virtual operations implied by the operation in block
    pub virtual_op: u16,
}

/// One link in an account's history chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountHistoryNode {
    /// The history record this node references
    pub operation_id: OperationHistoryId,
    /// The previous (older) node for the same account, or `None` at the
    /// end of the chain
    pub next: Option<AccountHistoryNodeId>,
}

/// Persist an immutable history record for an applied operation.
///
/// No validation happens here; the operation is already known-applied.
/// Always succeeds and returns the record's sequence id.
pub fn record(
    db: &mut Database,
    op: Operation,
    result: OperationResult,
    position: OperationPosition,
) -> OperationHistoryId {
    db.operation_histories.create(|_| OperationHistory {
        op,
        result,
        block_num: position.block_num,
        trx_in_block: position.trx_in_block,
        op_in_trx: position.op_in_trx,
        virtual_op: position.virtual_op,
    })
}

/// Thread `operation_id` onto `account`'s history chain.
///
/// Allocates a node pointing at the account's current most-recent node,
/// then swings the account's anchor to the new node. Called once per
/// (account, operation) pair the dispatch layer deems relevant.
pub fn append_to_account(
    db: &mut Database,
    account: AccountId,
    operation_id: OperationHistoryId,
) -> Result<AccountHistoryNodeId> {
    let previous = db.accounts.get(account)?.most_recent_op;
    let node = db.account_history_nodes.create(|_| AccountHistoryNode {
        operation_id,
        next: previous,
    });
    db.accounts.modify(account, |a| {
        a.most_recent_op = Some(node);
    })?;
    trace!(%account, %operation_id, node = %node, "appended history node");
    Ok(node)
}

/// Iterate `account`'s history, newest first.
///
/// The traversal is lazy (one record lookup per step), finite, and
/// restartable: calling `history` again yields an identical sequence.
/// An unknown account yields an empty iterator.
pub fn history(db: &Database, account: AccountId) -> History<'_> {
    History {
        db,
        cursor: db.accounts.find(account).and_then(|a| a.most_recent_op),
    }
}

/// Iterator over an account's history chain, newest first
#[derive(Debug, Clone)]
pub struct History<'a> {
    db: &'a Database,
    cursor: Option<AccountHistoryNodeId>,
}

impl<'a> Iterator for History<'a> {
    type Item = &'a OperationHistory;

    fn next(&mut self) -> Option<Self::Item> {
        let node_id = self.cursor.take()?;
        let node = self.db.account_history_nodes.find(node_id)?;
        self.cursor = node.next;
        self.db.operation_histories.find(node.operation_id)
    }
}
