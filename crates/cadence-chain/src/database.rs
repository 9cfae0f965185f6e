//! The ledger database
//!
//! Aggregates the per-type object tables and the balance ledger behind a
//! single-writer facade. Evaluators read through it during evaluate and
//! mutate through it during apply; no other write path exists.

use crate::history::{AccountHistoryNode, OperationHistory};
use crate::object::{Account, Asset, WithdrawPermission};
use cadence_core::{
    AccountHistoryNodeId, AccountId, AssetAmount, AssetId, Error, OperationHistoryId, Result,
    WithdrawPermissionId,
};
use cadence_store::Table;
use std::collections::BTreeMap;

/// All chain state this core reads and writes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Database {
    pub(crate) accounts: Table<AccountId, Account>,
    pub(crate) assets: Table<AssetId, Asset>,
    pub(crate) withdraw_permissions: Table<WithdrawPermissionId, WithdrawPermission>,
    pub(crate) operation_histories: Table<OperationHistoryId, OperationHistory>,
    pub(crate) account_history_nodes: Table<AccountHistoryNodeId, AccountHistoryNode>,
    balances: BTreeMap<(AccountId, AssetId), i64>,
}

impl Database {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new account
    pub fn create_account(&mut self, name: impl Into<String>) -> AccountId {
        let account = Account::new(name);
        self.accounts.create(|_| account)
    }

    /// Register a new asset
    pub fn create_asset(
        &mut self,
        symbol: impl Into<String>,
        issuer: AccountId,
        transfer_restricted: bool,
        white_list: bool,
    ) -> AssetId {
        let asset = Asset::new(symbol, issuer, transfer_restricted, white_list);
        self.assets.create(|_| asset)
    }

    /// Look up an account
    pub fn account(&self, id: AccountId) -> Result<&Account> {
        self.accounts.get(id)
    }

    /// Look up an account that may not exist
    pub fn find_account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.find(id)
    }

    /// Look up an asset
    pub fn asset(&self, id: AssetId) -> Result<&Asset> {
        self.assets.get(id)
    }

    /// Look up an asset that may not exist
    pub fn find_asset(&self, id: AssetId) -> Option<&Asset> {
        self.assets.find(id)
    }

    /// Look up a withdrawal permission
    pub fn withdraw_permission(&self, id: WithdrawPermissionId) -> Result<&WithdrawPermission> {
        self.withdraw_permissions.get(id)
    }

    /// Whitelist-authorize `account` for `asset`
    pub fn authorize_asset(&mut self, account: AccountId, asset: AssetId) -> Result<()> {
        self.accounts.modify(account, |a| {
            a.authorized_assets.insert(asset);
        })
    }

    /// The account's balance in `asset`; unknown pairs hold zero
    pub fn get_balance(&self, account: AccountId, asset: AssetId) -> i64 {
        self.balances.get(&(account, asset)).copied().unwrap_or(0)
    }

    /// Adjust the account's balance by `delta.amount`.
    ///
    /// Apply phases call this only after evaluate has proven solvency, so
    /// a balance going negative or overflowing here is a caller contract
    /// breach, not user input.
    pub fn adjust_balance(&mut self, account: AccountId, delta: AssetAmount) -> Result<()> {
        let key = (account, delta.asset_id);
        let current = self.balances.get(&key).copied().unwrap_or(0);
        let updated = current.checked_add(delta.amount).ok_or_else(|| {
            Error::internal(format!("balance overflow adjusting {account} by {delta}"))
        })?;
        if updated < 0 {
            return Err(Error::internal(format!(
                "balance of {account} would go negative: {current} + {}",
                delta.amount
            )));
        }
        self.balances.insert(key, updated);
        Ok(())
    }
}
