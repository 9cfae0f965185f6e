//! # Cadence Core - Foundation Types
//!
//! Shared vocabulary for the Cadence ledger: typed object identifiers,
//! chain timestamps, asset amounts, consensus parameters, and the unified
//! error type used by every evaluate/apply path.
//!
//! Everything in this crate is pure data with deterministic arithmetic.
//! Identical inputs must produce identical results on every node, so all
//! time and amount math is checked rather than wrapping.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod amount;
pub mod error;
pub mod id;
pub mod parameters;
pub mod time;

pub use amount::AssetAmount;
pub use error::{Error, Result};
pub use id::{
    AccountHistoryNodeId, AccountId, AssetId, ObjectId, OperationHistoryId, WithdrawPermissionId,
};
pub use parameters::ChainParameters;
pub use time::ChainTime;
