//! Asset amounts
//!
//! An amount is always paired with the asset it denominates. Comparison
//! across assets is a caller bug, so the helpers here require matching
//! asset ids.

use crate::id::AssetId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An (amount, asset) pair used for limits, claims, and balance deltas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetAmount {
    /// Signed amount in the asset's smallest unit
    pub amount: i64,
    /// The denominating asset
    pub asset_id: AssetId,
}

impl AssetAmount {
    /// Construct an amount of `asset_id`
    pub const fn new(amount: i64, asset_id: AssetId) -> Self {
        Self { amount, asset_id }
    }

    /// The negation of this amount, or `None` on overflow (`i64::MIN`)
    pub fn negated(self) -> Option<Self> {
        Some(Self {
            amount: self.amount.checked_neg()?,
            asset_id: self.asset_id,
        })
    }
}

impl fmt::Display for AssetAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.amount, self.asset_id)
    }
}
