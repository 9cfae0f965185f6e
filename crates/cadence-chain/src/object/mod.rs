//! Persisted ledger objects

mod account;
mod asset;
mod withdraw_permission;

pub use account::Account;
pub use asset::Asset;
pub use withdraw_permission::WithdrawPermission;
