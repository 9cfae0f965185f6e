//! Account object

use crate::object::Asset;
use cadence_core::{AccountHistoryNodeId, AssetId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An account on the ledger.
///
/// Besides its name and whitelist authorizations, the account anchors its
/// history chain: `most_recent_op` points at the newest
/// [`AccountHistoryNode`](crate::history::AccountHistoryNode) for this
/// account, or `None` if no operation has concerned it yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Human-readable account name
    pub name: String,
    /// Assets this account is whitelist-authorized to hold and transfer
    pub authorized_assets: BTreeSet<AssetId>,
    /// Newest node of this account's history chain
    pub most_recent_op: Option<AccountHistoryNodeId>,
}

impl Account {
    /// Create an account with no authorizations and empty history
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            authorized_assets: BTreeSet::new(),
            most_recent_op: None,
        }
    }

    /// Whether this account may transact in `asset`. Assets that do not
    /// enforce a whitelist are open to every account.
    pub fn is_authorized_asset(&self, asset_id: AssetId, asset: &Asset) -> bool {
        !asset.enforce_white_list() || self.authorized_assets.contains(&asset_id)
    }
}
