//! Operation payloads
//!
//! The closed set of operation kinds this core dispatches, as a tagged
//! union over per-operation payload structs, plus the result union their
//! apply phases produce.

use cadence_core::{
    AccountId, AssetAmount, ChainTime, Error, ObjectId, Result, WithdrawPermissionId,
};
use serde::{Deserialize, Serialize};

/// Grant `authorized_account` a recurring withdrawal permission against
/// `withdraw_from_account`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawPermissionCreate {
    /// The account the claimant will pull funds from
    pub withdraw_from_account: AccountId,
    /// The account being authorized to claim
    pub authorized_account: AccountId,
    /// Maximum claimable amount per period
    pub withdrawal_limit: AssetAmount,
    /// Period length in seconds
    pub withdrawal_period_sec: u64,
    /// Start of the first period; must be strictly in the future
    pub period_start_time: ChainTime,
    /// Number of periods until the permission expires
    pub periods_until_expiration: u32,
}

/// Claim funds under an existing withdrawal permission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawPermissionClaim {
    /// The permission being claimed against
    pub withdraw_permission: WithdrawPermissionId,
    /// Must match the permission's `withdraw_from_account`
    pub withdraw_from_account: AccountId,
    /// Must match the permission's `authorized_account`
    pub withdraw_to_account: AccountId,
    /// Amount to withdraw this claim
    pub amount_to_withdraw: AssetAmount,
}

/// Replace an existing permission's limit, period, and expiration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawPermissionUpdate {
    /// The permission being updated
    pub permission_to_update: WithdrawPermissionId,
    /// Must match the stored `withdraw_from_account`
    pub withdraw_from_account: AccountId,
    /// Must match the stored `authorized_account`
    pub authorized_account: AccountId,
    /// New per-period limit
    pub withdrawal_limit: AssetAmount,
    /// New period length in seconds
    pub withdrawal_period_sec: u64,
    /// New current-period start; may equal head time, unlike create
    pub period_start_time: ChainTime,
    /// New number of periods until expiration
    pub periods_until_expiration: u32,
}

/// Remove an existing withdrawal permission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawPermissionDelete {
    /// The permission being deleted
    pub withdrawal_permission: WithdrawPermissionId,
    /// Must match the stored `withdraw_from_account`
    pub withdraw_from_account: AccountId,
    /// Must match the stored `authorized_account`
    pub authorized_account: AccountId,
}

impl WithdrawPermissionCreate {
    /// The expiration this operation fixes:
    /// `period_start_time + periods_until_expiration * withdrawal_period_sec`.
    /// Overflow is an internal invariant error, never silent wraparound.
    pub fn expiration(&self) -> Result<ChainTime> {
        computed_expiration(
            self.period_start_time,
            self.periods_until_expiration,
            self.withdrawal_period_sec,
        )
    }
}

impl WithdrawPermissionUpdate {
    /// The expiration this operation fixes, computed the same way as
    /// [`WithdrawPermissionCreate::expiration`].
    pub fn expiration(&self) -> Result<ChainTime> {
        computed_expiration(
            self.period_start_time,
            self.periods_until_expiration,
            self.withdrawal_period_sec,
        )
    }
}

fn computed_expiration(start: ChainTime, periods: u32, period_sec: u64) -> Result<ChainTime> {
    let total = u64::from(periods)
        .checked_mul(period_sec)
        .ok_or_else(|| Error::internal("overflow computing periods_until_expiration * period"))?;
    start
        .checked_add_secs(total)
        .ok_or_else(|| Error::internal("overflow computing permission expiration"))
}

/// Tagged union over the operation kinds this core handles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Create a withdrawal permission
    WithdrawPermissionCreate(WithdrawPermissionCreate),
    /// Claim against a withdrawal permission
    WithdrawPermissionClaim(WithdrawPermissionClaim),
    /// Update a withdrawal permission
    WithdrawPermissionUpdate(WithdrawPermissionUpdate),
    /// Delete a withdrawal permission
    WithdrawPermissionDelete(WithdrawPermissionDelete),
}

impl Operation {
    /// Operation kind name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::WithdrawPermissionCreate(_) => "withdraw_permission_create",
            Self::WithdrawPermissionClaim(_) => "withdraw_permission_claim",
            Self::WithdrawPermissionUpdate(_) => "withdraw_permission_update",
            Self::WithdrawPermissionDelete(_) => "withdraw_permission_delete",
        }
    }

    /// The accounts this operation concerns, in stable order with
    /// duplicates removed. A history record for this operation is
    /// threaded onto each of them.
    pub fn relevant_accounts(&self) -> Vec<AccountId> {
        let (from, other) = match self {
            Self::WithdrawPermissionCreate(op) => {
                (op.withdraw_from_account, op.authorized_account)
            }
            Self::WithdrawPermissionClaim(op) => {
                (op.withdraw_from_account, op.withdraw_to_account)
            }
            Self::WithdrawPermissionUpdate(op) => {
                (op.withdraw_from_account, op.authorized_account)
            }
            Self::WithdrawPermissionDelete(op) => {
                (op.withdraw_from_account, op.authorized_account)
            }
        };
        if from == other {
            vec![from]
        } else {
            vec![from, other]
        }
    }
}

/// Result of an applied operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationResult {
    /// The operation produced no value
    Void,
    /// The operation created an object with this sequence number
    ObjectId(u64),
}

impl OperationResult {
    /// Build an [`OperationResult::ObjectId`] from a typed id
    pub fn object_id(id: impl ObjectId) -> Self {
        Self::ObjectId(id.sequence())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::AssetId;

    #[test]
    fn relevant_accounts_deduplicate() {
        let account = AccountId::from_sequence(3);
        let op = Operation::WithdrawPermissionDelete(WithdrawPermissionDelete {
            withdrawal_permission: WithdrawPermissionId::from_sequence(0),
            withdraw_from_account: account,
            authorized_account: account,
        });
        assert_eq!(op.relevant_accounts(), vec![account]);
    }

    #[test]
    fn expiration_is_checked() {
        let op = WithdrawPermissionCreate {
            withdraw_from_account: AccountId::from_sequence(0),
            authorized_account: AccountId::from_sequence(1),
            withdrawal_limit: AssetAmount::new(100, AssetId::from_sequence(0)),
            withdrawal_period_sec: u64::MAX,
            period_start_time: ChainTime::from_secs(10),
            periods_until_expiration: 2,
        };
        assert!(matches!(op.expiration(), Err(Error::Internal { .. })));

        let op = WithdrawPermissionCreate {
            withdrawal_period_sec: 3_600,
            periods_until_expiration: 2,
            ..op
        };
        assert_eq!(op.expiration(), Ok(ChainTime::from_secs(10 + 7_200)));
    }
}
