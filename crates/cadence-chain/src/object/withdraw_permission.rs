//! Withdraw permission object
//!
//! One active recurring-withdrawal grant: `withdraw_from_account` allows
//! `authorized_account` to claim up to `withdrawal_limit` per
//! `withdrawal_period_sec`-second period until `expiration`.
//!
//! Invariants: `claimed_this_period <= withdrawal_limit.amount` after any
//! successful claim; `period_start_time` only ever advances forward, in
//! whole multiples of `withdrawal_period_sec`; `expiration` is fixed at
//! create/update time and never recomputed elsewhere.

use cadence_core::{AccountId, AssetAmount, ChainTime, Error, Result};
use serde::{Deserialize, Serialize};

/// A recurring withdrawal permission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawPermission {
    /// The account funds are pulled from
    pub withdraw_from_account: AccountId,
    /// The account authorized to claim
    pub authorized_account: AccountId,
    /// Maximum claimable amount per period
    pub withdrawal_limit: AssetAmount,
    /// Period length in seconds, always greater than zero
    pub withdrawal_period_sec: u64,
    /// Start of the current period
    pub period_start_time: ChainTime,
    /// After this time the permission is inert; claims fail but the
    /// record is not auto-deleted
    pub expiration: ChainTime,
    /// Amount already claimed within the current period
    pub claimed_this_period: i64,
}

impl WithdrawPermission {
    /// Number of whole periods elapsed between `period_start_time` and
    /// `now`, using truncating division. Zero when `now` is before the
    /// period start.
    pub fn elapsed_periods(&self, now: ChainTime) -> Result<u64> {
        if self.withdrawal_period_sec == 0 {
            // The evaluators never persist a zero period; reaching this
            // means a caller bypassed them.
            return Err(Error::internal("withdrawal_period_sec is zero"));
        }
        Ok(now.secs_since(self.period_start_time) / self.withdrawal_period_sec)
    }

    /// Amount still claimable at `now`, after conceptually applying any
    /// due period rollover without persisting it.
    ///
    /// If at least one period boundary has passed the whole limit is
    /// available again; otherwise the current period's claims count
    /// against it.
    pub fn available_this_period(&self, now: ChainTime) -> Result<i64> {
        if self.elapsed_periods(now)? > 0 {
            return Ok(self.withdrawal_limit.amount);
        }
        Ok((self.withdrawal_limit.amount - self.claimed_this_period).max(0))
    }
}
