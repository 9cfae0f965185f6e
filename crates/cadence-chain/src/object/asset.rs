//! Asset object

use cadence_core::AccountId;
use serde::{Deserialize, Serialize};

/// An asset on the ledger, with the transfer-policy flags the withdrawal
/// claim path consults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Ticker symbol
    pub symbol: String,
    /// The account that issued this asset
    pub issuer: AccountId,
    /// When set, only transfers involving the issuer are allowed
    pub transfer_restricted: bool,
    /// When set, both transfer endpoints must be whitelist-authorized
    pub white_list: bool,
}

impl Asset {
    /// Create an asset with the given policy flags
    pub fn new(
        symbol: impl Into<String>,
        issuer: AccountId,
        transfer_restricted: bool,
        white_list: bool,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            issuer,
            transfer_restricted,
            white_list,
        }
    }

    /// Whether transfers must involve the issuer on one end
    pub fn is_transfer_restricted(&self) -> bool {
        self.transfer_restricted
    }

    /// Whether both transfer endpoints must be whitelisted
    pub fn enforce_white_list(&self) -> bool {
        self.white_list
    }
}
